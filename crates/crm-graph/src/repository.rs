//! Entity operations over a [`GraphSession`].
//!
//! Each method validates nothing beyond what the typed inputs already
//! guarantee, runs exactly one statement, and maps the rows back.

use std::sync::Arc;

use crm_core::{
    CrmError, CrmResult, EntityKind, EntityPatch, EntityRecord, LinkConfirmation, LinkKind, NewEntity,
};
use tracing::{debug, info};

use crate::queries::{create, link, read, update};
use crate::session::{GraphSession, Row, Statement};

/// The CRM's view of the graph store.
#[derive(Clone)]
pub struct CrmGraph {
    session: Arc<dyn GraphSession>,
}

impl CrmGraph {
    pub fn new(session: Arc<dyn GraphSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &dyn GraphSession {
        self.session.as_ref()
    }

    async fn run(&self, statement: Statement) -> CrmResult<Vec<Row>> {
        self.session.run(statement).await.map_err(CrmError::Storage)
    }

    fn records(kind: EntityKind, rows: Vec<Row>) -> CrmResult<Vec<EntityRecord>> {
        rows.into_iter().map(|row| EntityRecord::from_columns(kind, row)).collect()
    }

    /// Upsert a node and merge its supplied reference edges.
    ///
    /// A missing required parent fails the whole statement with
    /// `NotFound`; a missing optional target leaves that slot null.
    pub async fn create(&self, entity: NewEntity) -> CrmResult<EntityRecord> {
        let kind = entity.kind;
        let rows = self.run(create::create_statement(&entity)).await?;

        let Some(row) = rows.into_iter().next() else {
            return Err(match create::missing_parent_message(&entity) {
                Some(msg) => CrmError::not_found(msg),
                None => CrmError::Storage(anyhow::anyhow!("MERGE of {kind} {} returned no rows", entity.id)),
            });
        };

        let record = EntityRecord::from_columns(kind, row)?;
        info!(label = kind.label(), id = %record.id, "Upserted entity");
        Ok(record)
    }

    pub async fn get(&self, kind: EntityKind, id: &str) -> CrmResult<EntityRecord> {
        let rows = self.run(read::get_statement(kind, id)).await?;
        match rows.into_iter().next() {
            Some(row) => EntityRecord::from_columns(kind, row),
            None => Err(CrmError::not_found(format!("{kind} not found"))),
        }
    }

    pub async fn list(&self, kind: EntityKind) -> CrmResult<Vec<EntityRecord>> {
        let rows = self.run(read::list_statement(kind)).await?;
        debug!(label = kind.label(), count = rows.len(), "Listed entities");
        Self::records(kind, rows)
    }

    /// Set only the patch's fields on an existing node.
    pub async fn update(&self, id: &str, patch: EntityPatch) -> CrmResult<EntityRecord> {
        let kind = patch.kind;
        let rows = self.run(update::update_statement(id, &patch)).await?;

        let Some(row) = rows.into_iter().next() else {
            return Err(CrmError::not_found(format!("{kind} not found")));
        };

        info!(label = kind.label(), id, fields = ?patch.field_names(), "Updated entity");
        EntityRecord::from_columns(kind, row)
    }

    pub async fn search(&self, kind: EntityKind, name: &str) -> CrmResult<Vec<EntityRecord>> {
        if !kind.is_searchable() {
            return Err(CrmError::validation(format!("{kind} has no name to search")));
        }
        let rows = self.run(read::search_statement(kind, name)).await?;
        debug!(label = kind.label(), query = name, count = rows.len(), "Searched entities");
        Self::records(kind, rows)
    }

    /// Link two existing nodes. `owner_id` and `other_id` are in route order.
    pub async fn link(&self, kind: LinkKind, owner_id: &str, other_id: &str) -> CrmResult<LinkConfirmation> {
        let (source_id, target_id) = kind.edge_ids(owner_id, other_id);
        let rows = self.run(link::link_statement(kind, source_id, target_id)).await?;

        if rows.is_empty() {
            return Err(CrmError::not_found(format!(
                "{} or {} not found",
                kind.owner(),
                if kind.owner() == kind.source() { kind.target() } else { kind.source() }
            )));
        }

        info!(
            source = kind.source().label(),
            source_id,
            target = kind.target().label(),
            target_id,
            "Linked entities"
        );
        Ok(LinkConfirmation::new(kind, source_id.to_string(), target_id.to_string()))
    }

    /// Round-trip a trivial statement to check the store is reachable.
    pub async fn ping(&self) -> CrmResult<String> {
        let rows = self
            .run(Statement::new("RETURN 'Neo4j connection successful' AS message").returning(["message"]))
            .await?;
        rows.into_iter()
            .next()
            .and_then(|mut row| row.remove("message"))
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| CrmError::Storage(anyhow::anyhow!("Ping returned no message")))
    }
}
