use crate::collections::CollectionsStore;
use crate::detail::DetailRequest;
use crate::journal::JournalStore;
use crate::navigator::GuidanceRequest;
use crate::team::TeamStore;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadDetail(DetailRequest),
    LoadSpeciesIndex,
    AskNavigator(GuidanceRequest),
    SaveTeam(TeamStore),
    SaveCollections(CollectionsStore),
    SaveJournal(JournalStore),
}
