//! In-memory catalog store for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::catalog::{
    domain::{
        CatalogCode, CatalogEntry, DutyDefinition, DutyDefinitionId, Location, LocationId, Role,
        RoleId, TimeSlot, TimeSlotId,
    },
    ports::{CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult},
};
use crate::tenant::domain::{TenantContext, TenantId};

/// Thread-safe in-memory store for all four catalogs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    state: Arc<RwLock<CatalogState>>,
}

type Table<T> = HashMap<(TenantId, <T as CatalogEntry>::Id), T>;

#[derive(Debug, Default)]
struct CatalogState {
    duties: Table<DutyDefinition>,
    slots: Table<TimeSlot>,
    locations: Table<Location>,
    roles: Table<Role>,
}

impl InMemoryCatalogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CatalogRepositoryResult<RwLockReadGuard<'_, CatalogState>> {
        self.state.read().map_err(|err| {
            CatalogRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> CatalogRepositoryResult<RwLockWriteGuard<'_, CatalogState>> {
        self.state.write().map_err(|err| {
            CatalogRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn code_taken<T: CatalogEntry>(table: &Table<T>, tenant: TenantId, entry: &T) -> bool {
    table.iter().any(|((owner, id), existing)| {
        *owner == tenant && *id != entry.entry_id() && existing.entry_code() == entry.entry_code()
    })
}

fn insert_entry<T: CatalogEntry>(
    table: &mut Table<T>,
    tenant: TenantId,
    entry: &T,
) -> CatalogRepositoryResult<()> {
    if code_taken(table, tenant, entry) {
        return Err(CatalogRepositoryError::DuplicateCode {
            kind: T::KIND,
            code: entry.entry_code().clone(),
        });
    }
    table.insert((tenant, entry.entry_id()), entry.clone());
    Ok(())
}

fn update_entry<T: CatalogEntry>(
    table: &mut Table<T>,
    tenant: TenantId,
    entry: &T,
) -> CatalogRepositoryResult<()> {
    if !table.contains_key(&(tenant, entry.entry_id())) {
        return Err(CatalogRepositoryError::not_found::<T>(entry.entry_id()));
    }
    insert_entry(table, tenant, entry)
}

fn find_code<T: CatalogEntry>(table: &Table<T>, tenant: TenantId, code: &CatalogCode) -> Option<T> {
    table
        .iter()
        .find(|((owner, _), entry)| *owner == tenant && entry.entry_code() == code)
        .map(|(_, entry)| entry.clone())
}

fn list_entries<T: CatalogEntry>(
    table: &Table<T>,
    tenant: TenantId,
    include_inactive: bool,
) -> Vec<T> {
    let mut entries: Vec<T> = table
        .iter()
        .filter(|((owner, _), entry)| {
            *owner == tenant && (include_inactive || entry.entry_is_active())
        })
        .map(|(_, entry)| entry.clone())
        .collect();
    entries.sort_by(|left, right| left.entry_code().cmp(right.entry_code()));
    entries
}

macro_rules! impl_memory_catalog {
    ($entry:ty, $id:ty, $field:ident) => {
        #[async_trait]
        impl CatalogRepository<$entry> for InMemoryCatalogStore {
            async fn insert(
                &self,
                ctx: &TenantContext,
                entry: &$entry,
            ) -> CatalogRepositoryResult<()> {
                let mut state = self.write()?;
                insert_entry(&mut state.$field, ctx.tenant_id(), entry)
            }

            async fn update(
                &self,
                ctx: &TenantContext,
                entry: &$entry,
            ) -> CatalogRepositoryResult<()> {
                let mut state = self.write()?;
                update_entry(&mut state.$field, ctx.tenant_id(), entry)
            }

            async fn find_by_id(
                &self,
                ctx: &TenantContext,
                id: $id,
            ) -> CatalogRepositoryResult<Option<$entry>> {
                let state = self.read()?;
                Ok(state.$field.get(&(ctx.tenant_id(), id)).cloned())
            }

            async fn find_by_code(
                &self,
                ctx: &TenantContext,
                code: &CatalogCode,
            ) -> CatalogRepositoryResult<Option<$entry>> {
                let state = self.read()?;
                Ok(find_code(&state.$field, ctx.tenant_id(), code))
            }

            async fn list(
                &self,
                ctx: &TenantContext,
                include_inactive: bool,
            ) -> CatalogRepositoryResult<Vec<$entry>> {
                let state = self.read()?;
                Ok(list_entries(&state.$field, ctx.tenant_id(), include_inactive))
            }
        }
    };
}

impl_memory_catalog!(DutyDefinition, DutyDefinitionId, duties);
impl_memory_catalog!(TimeSlot, TimeSlotId, slots);
impl_memory_catalog!(Location, LocationId, locations);
impl_memory_catalog!(Role, RoleId, roles);
