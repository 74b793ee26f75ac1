//! Todo service - cache-aside coordination between the durable store and the cache

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::todo::{
    validate_todo_title, CacheLookup, NewTodo, Todo, TodoCache, TodoId, TodoRepository,
    UpdateTodo,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_cache_lookup, CacheEntryKind, CacheLookupResult,
};

/// What to do when filling the cache after a miss fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePopulation {
    /// Log the failure and return the durable value anyway
    #[default]
    BestEffort,
    /// Fail the read
    Required,
}

/// Coordinates reads and writes across the durable store and the cache
///
/// Reads try the cache first and fill it on a miss. Writes invalidate the
/// cached list before touching the store, then refresh or drop the single-item
/// entry afterwards. Nothing here is retried and no locks are taken; both
/// backends are responsible for their own concurrency.
#[derive(Debug, Clone)]
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
    cache: Arc<dyn TodoCache>,
    population: CachePopulation,
}

impl TodoService {
    pub fn new(repository: Arc<dyn TodoRepository>, cache: Arc<dyn TodoCache>) -> Self {
        Self {
            repository,
            cache,
            population: CachePopulation::default(),
        }
    }

    pub fn with_population(mut self, population: CachePopulation) -> Self {
        self.population = population;
        self
    }

    /// All todos, most recently updated first
    pub async fn list(&self) -> Result<Vec<Todo>, DomainError> {
        let lookup = self.cache.list().await.map_err(|e| {
            record_cache_lookup(CacheEntryKind::List, CacheLookupResult::Error);
            e.context("reading todo list from cache")
        })?;

        match lookup {
            CacheLookup::Hit(todos) => {
                record_cache_lookup(CacheEntryKind::List, CacheLookupResult::Hit);
                debug!(count = todos.len(), "Todo list served from cache");
                return Ok(todos);
            }
            CacheLookup::Miss => {
                record_cache_lookup(CacheEntryKind::List, CacheLookupResult::Miss);
                debug!("Todo list cache miss");
            }
        }

        let todos = self
            .repository
            .list()
            .await
            .map_err(|e| e.context("listing todos from database"))?;

        self.populated(self.cache.save_list(&todos).await, "caching todo list")?;

        Ok(todos)
    }

    /// A single todo by id
    pub async fn get(&self, id: TodoId) -> Result<Todo, DomainError> {
        let lookup = self.cache.get(id).await.map_err(|e| {
            record_cache_lookup(CacheEntryKind::Item, CacheLookupResult::Error);
            e.context("reading todo from cache")
        })?;

        match lookup {
            CacheLookup::Hit(todo) => {
                record_cache_lookup(CacheEntryKind::Item, CacheLookupResult::Hit);
                debug!(id = %id, "Todo served from cache");
                return Ok(todo);
            }
            CacheLookup::Miss => {
                record_cache_lookup(CacheEntryKind::Item, CacheLookupResult::Miss);
                debug!(id = %id, "Todo cache miss");
            }
        }

        let todo = self
            .repository
            .get(id)
            .await
            .map_err(|e| e.context("reading todo from database"))?
            .ok_or_else(|| DomainError::not_found(format!("Todo '{}' not found", id)))?;

        self.populated(self.cache.save(&todo).await, "caching todo")?;

        Ok(todo)
    }

    /// Create a new todo
    pub async fn create(&self, request: NewTodo) -> Result<Todo, DomainError> {
        info!(title = %request.title, complete = request.complete, "Creating todo");

        validate_todo_title(&request.title)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.invalidate_list().await?;

        let todo = self
            .repository
            .create(request)
            .await
            .map_err(|e| e.context("creating todo in database"))?;

        self.cache
            .save(&todo)
            .await
            .map_err(|e| e.context("caching created todo"))?;

        Ok(todo)
    }

    /// Update an existing todo, returning the stored version
    pub async fn update(&self, request: UpdateTodo) -> Result<Todo, DomainError> {
        info!(id = %request.id, complete = request.complete, "Updating todo");

        validate_todo_title(&request.title)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.invalidate_list().await?;

        let todo = self
            .repository
            .update(&request)
            .await
            .map_err(|e| e.context("updating todo in database"))?;

        self.cache
            .save(&todo)
            .await
            .map_err(|e| e.context("caching updated todo"))?;

        Ok(todo)
    }

    /// Delete a todo; deleting an unknown id is not an error
    pub async fn delete(&self, id: TodoId) -> Result<(), DomainError> {
        info!(id = %id, "Deleting todo");

        self.invalidate_list().await?;

        let existed = self
            .repository
            .delete(id)
            .await
            .map_err(|e| e.context("deleting todo from database"))?;

        if !existed {
            debug!(id = %id, "Todo to delete did not exist");
        }

        self.cache
            .delete(id)
            .await
            .map_err(|e| e.context("removing todo from cache"))?;

        Ok(())
    }

    /// Drop every cache entry
    pub async fn clear_cache(&self) -> Result<(), DomainError> {
        info!("Clearing todo cache");
        self.cache.clear().await.map_err(|e| e.context("clearing cache"))
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_enabled()
    }

    /// Number of stored todos; doubles as a database reachability probe
    pub async fn check_store(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    pub async fn check_cache(&self) -> Result<(), DomainError> {
        self.cache.ping().await
    }

    async fn invalidate_list(&self) -> Result<(), DomainError> {
        self.cache
            .delete_list()
            .await
            .map_err(|e| e.context("invalidating cached todo list"))
    }

    fn populated(&self, result: Result<(), DomainError>, step: &str) -> Result<(), DomainError> {
        match (result, self.population) {
            (Ok(()), _) => Ok(()),
            (Err(e), CachePopulation::BestEffort) => {
                warn!(error = %e, "{} failed, serving database value", step);
                Ok(())
            }
            (Err(e), CachePopulation::Required) => Err(e.context(step)),
        }
    }
}
