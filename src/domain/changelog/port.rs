use crate::domain::changelog::models::entry::{
    ChangeEvent, ChangelogStats, EntryFilter, NewChangeEvent,
};

pub trait ChangelogRepository: Send + Sync + 'static + Clone {
    fn append(&self, event: NewChangeEvent) -> impl Future<Output = ChangeEvent> + Send;
    fn entries(&self, filter: EntryFilter) -> impl Future<Output = Vec<ChangeEvent>> + Send;
    fn stats(&self) -> impl Future<Output = ChangelogStats> + Send;
}

// The changelog service is what the monitor and the http layer talk to.
pub trait ChangelogService: Send + Sync + 'static + Clone {
    fn append(&self, event: NewChangeEvent) -> impl Future<Output = ChangeEvent> + Send;
    fn entries(&self, filter: EntryFilter) -> impl Future<Output = Vec<ChangeEvent>> + Send;
    fn stats(&self) -> impl Future<Output = ChangelogStats> + Send;
}
