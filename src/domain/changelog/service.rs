use crate::domain::changelog::models::entry::{
    ChangeEvent, ChangelogStats, EntryFilter, NewChangeEvent,
};
use crate::domain::changelog::port::{ChangelogRepository, ChangelogService};

#[derive(Clone)]
pub struct Service<R: ChangelogRepository> {
    repository: R,
}

impl<R: ChangelogRepository> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: ChangelogRepository> ChangelogService for Service<R> {
    async fn append(&self, event: NewChangeEvent) -> ChangeEvent {
        self.repository.append(event).await
    }

    async fn entries(&self, filter: EntryFilter) -> Vec<ChangeEvent> {
        self.repository.entries(filter).await
    }

    async fn stats(&self) -> ChangelogStats {
        self.repository.stats().await
    }
}
