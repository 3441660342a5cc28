/// Failure from the Pokémon lookup service.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Could not find details for \"{0}\".")]
    NotFound(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("response parse error: {0}")]
    Decode(String),
}

/// Failure from the AI guidance proxy.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GuidanceError {
    #[error("Your query was blocked. Reason: {reason}. {}", block_detail(.message))]
    Blocked {
        reason: String,
        message: Option<String>,
    },
    #[error("The AI returned an empty response. This can happen with very broad or ambiguous questions. Please try being more specific.")]
    EmptyResponse,
    #[error("The AI stopped generating a response unexpectedly. Reason: {reason}. Please try rephrasing your question.")]
    AbnormalStop { reason: String },
    #[error("{}", server_message(.status, .message))]
    Server { status: u16, message: Option<String> },
    #[error("The request to the AI took too long and has timed out. Please try again later.")]
    Timeout,
    #[error("{0}")]
    Transport(String),
    #[error("The AI returned invalid data: {0}")]
    Decode(String),
}

fn block_detail(message: &Option<String>) -> &str {
    message
        .as_deref()
        .unwrap_or("No additional message provided.")
}

fn server_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => message.clone(),
        _ => format!("Proxy request failed with status {status}"),
    }
}

/// Rejected team operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TeamError {
    #[error("Team is full ({0}).")]
    RosterFull(usize),
    #[error("A team member needs a species.")]
    MissingSpecies,
    #[error("Level {0} is out of range (1-100).")]
    InvalidLevel(u32),
    #[error("A team member has one or two types, got {0}.")]
    InvalidTypes(usize),
    #[error("No team member with id {0}.")]
    UnknownMember(String),
    #[error("{0} is already in this moveset.")]
    DuplicateMove(String),
    #[error("Move slot {0} does not exist.")]
    SlotOutOfRange(usize),
}

/// Failure reading or writing the key-value store.
#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored value for {key} is corrupted: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
