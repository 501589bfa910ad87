//! Reference Data Store
//!
//! Holds the three dropdown lists (roles, sectors, supervisors). Each list is
//! fetched independently and stored the moment it resolves; one failing list
//! never blocks or invalidates the others. Consumers must tolerate any list
//! still being pending.

mod options;

pub use options::{Id, Identified, ParentSector, RoleOption, SectorOption, SupervisorOption};
pub(crate) use options::lenient_text;

use std::fmt;
use tracing::{info, warn};

use crate::api::UserApi;
use crate::error::LoadError;

/// Which lookup list a fetch or failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceList {
    Roles,
    Sectors,
    Supervisors,
}

impl ReferenceList {
    pub const ALL: [ReferenceList; 3] = [
        ReferenceList::Roles,
        ReferenceList::Sectors,
        ReferenceList::Supervisors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceList::Roles => "roles",
            ReferenceList::Sectors => "sectors",
            ReferenceList::Supervisors => "supervisors",
        }
    }
}

impl fmt::Display for ReferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load state of a single list.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Pending,
    Loaded(Vec<T>),
    Failed,
}

impl<T> Slot<T> {
    fn items(&self) -> &[T] {
        match self {
            Slot::Loaded(items) => items,
            Slot::Pending | Slot::Failed => &[],
        }
    }

    fn is_loaded(&self) -> bool {
        matches!(self, Slot::Loaded(_))
    }

    fn mark_failed(&mut self) {
        // A list that already arrived stays usable.
        if !self.is_loaded() {
            *self = Slot::Failed;
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Pending
    }
}

/// A resolved fetch, ready to be stored.
#[derive(Debug, Clone)]
pub enum ReferenceLoad {
    Roles(Vec<RoleOption>),
    Sectors(Vec<SectorOption>),
    Supervisors(Vec<SupervisorOption>),
}

impl ReferenceLoad {
    pub fn list(&self) -> ReferenceList {
        match self {
            ReferenceLoad::Roles(_) => ReferenceList::Roles,
            ReferenceLoad::Sectors(_) => ReferenceList::Sectors,
            ReferenceLoad::Supervisors(_) => ReferenceList::Supervisors,
        }
    }
}

/// Linear lookup by id. Lists are dropdown-sized.
pub fn find_by_id<'a, T: Identified>(list: &'a [T], id: &Id) -> Option<&'a T> {
    list.iter().find(|item| item.id() == id)
}

/// Fetch one list through the API, tagging failures with the list name.
pub async fn fetch_list(api: &dyn UserApi, list: ReferenceList) -> Result<ReferenceLoad, LoadError> {
    let loaded = match list {
        ReferenceList::Roles => api.fetch_roles().await.map(ReferenceLoad::Roles),
        ReferenceList::Sectors => api.fetch_sectors().await.map(ReferenceLoad::Sectors),
        ReferenceList::Supervisors => api.fetch_supervisors().await.map(ReferenceLoad::Supervisors),
    };
    loaded.map_err(|source| LoadError::Reference { list, source })
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceDataStore {
    roles: Slot<RoleOption>,
    sectors: Slot<SectorOption>,
    supervisors: Slot<SupervisorOption>,
}

impl ReferenceDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a list that just arrived, replacing any earlier copy.
    pub fn store(&mut self, load: ReferenceLoad) {
        info!(list = %load.list(), "Reference list loaded");
        match load {
            ReferenceLoad::Roles(items) => self.roles = Slot::Loaded(items),
            ReferenceLoad::Sectors(items) => self.sectors = Slot::Loaded(items),
            ReferenceLoad::Supervisors(items) => self.supervisors = Slot::Loaded(items),
        }
    }

    /// Log a failed fetch and mark its list. The other lists are untouched.
    /// Hands the error back for the caller to report.
    pub fn mark_failed(&mut self, err: LoadError) -> LoadError {
        warn!("{}", err);
        if let LoadError::Reference { list, .. } = err {
            match list {
                ReferenceList::Roles => self.roles.mark_failed(),
                ReferenceList::Sectors => self.sectors.mark_failed(),
                ReferenceList::Supervisors => self.supervisors.mark_failed(),
            }
        }
        err
    }

    pub fn roles(&self) -> &[RoleOption] {
        self.roles.items()
    }

    pub fn sectors(&self) -> &[SectorOption] {
        self.sectors.items()
    }

    pub fn supervisors(&self) -> &[SupervisorOption] {
        self.supervisors.items()
    }

    pub fn is_loaded(&self, list: ReferenceList) -> bool {
        match list {
            ReferenceList::Roles => self.roles.is_loaded(),
            ReferenceList::Sectors => self.sectors.is_loaded(),
            ReferenceList::Supervisors => self.supervisors.is_loaded(),
        }
    }

    /// Neither loaded nor failed yet.
    pub fn is_pending(&self, list: ReferenceList) -> bool {
        !self.is_loaded(list) && !self.has_failed(list)
    }

    pub fn has_failed(&self, list: ReferenceList) -> bool {
        match list {
            ReferenceList::Roles => matches!(self.roles, Slot::Failed),
            ReferenceList::Sectors => matches!(self.sectors, Slot::Failed),
            ReferenceList::Supervisors => matches!(self.supervisors, Slot::Failed),
        }
    }

    pub fn find_role(&self, id: &Id) -> Option<&RoleOption> {
        find_by_id(self.roles(), id)
    }

    pub fn find_sector(&self, id: &Id) -> Option<&SectorOption> {
        find_by_id(self.sectors(), id)
    }

    pub fn find_supervisor(&self, id: &Id) -> Option<&SupervisorOption> {
        find_by_id(self.supervisors(), id)
    }

    /// Sectors in list order with their display depth.
    pub fn sector_entries(&self) -> impl Iterator<Item = (&SectorOption, usize)> + '_ {
        self.sectors().iter().map(|sector| (sector, sector.depth()))
    }
}
