//! CRM entity kinds and their static schema.
//!
//! Every entity is described by one table: the graph label, the scalar
//! attributes it accepts, and the reference slots that are stored as
//! relationships rather than properties. The graph and web layers are
//! generic over these tables, so adding a field means editing one line here.

pub mod model;

use serde::Serialize;

/// The kinds of node the API manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    User,
    Account,
    Lead,
    Opportunity,
    Deal,
    Activity,
}

/// Value type accepted for a scalar attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
}

/// A scalar attribute stored as a node property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Must be present and non-null on create, and never nulled by update.
    pub required: bool,
    /// Applied on create when the caller omits the field.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    const fn text(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Text, required: false, default: None }
    }

    const fn email(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Email, required: false, default: None }
    }

    const fn number(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Number, required: false, default: None }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn default_to(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }
}

/// What happens when a reference points at a node that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefPolicy {
    /// The whole creation fails and nothing is written.
    Required,
    /// The node is still written; the relationship is skipped.
    Optional,
}

/// A single-valued reference to another entity, stored as an outgoing
/// relationship `(self)-[:relationship]->(target)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefSpec {
    pub name: &'static str,
    pub target: EntityKind,
    pub relationship: &'static str,
    pub policy: RefPolicy,
}

impl RefSpec {
    const fn required(name: &'static str, target: EntityKind, relationship: &'static str) -> Self {
        Self { name, target, relationship, policy: RefPolicy::Required }
    }

    const fn optional(name: &'static str, target: EntityKind, relationship: &'static str) -> Self {
        Self { name, target, relationship, policy: RefPolicy::Optional }
    }

    pub fn is_required(&self) -> bool {
        self.policy == RefPolicy::Required
    }
}

const USER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::text("role").required(),
    FieldSpec::text("region"),
    FieldSpec::email("email"),
];

const ACCOUNT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::text("industry"),
    FieldSpec::text("size"),
    FieldSpec::number("revenue"),
];

const LEAD_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::email("email"),
    FieldSpec::text("source"),
    FieldSpec::text("status").default_to("New"),
    FieldSpec::number("score"),
    FieldSpec::number("value"),
];

const OPPORTUNITY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::text("stage").default_to("Prospecting"),
    FieldSpec::number("estimated_value"),
    FieldSpec::number("probability"),
    FieldSpec::text("expected_close_date"),
];

const DEAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::number("amount"),
    FieldSpec::text("status").default_to("Open"),
    FieldSpec::text("closed_date"),
];

const ACTIVITY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("type").required(),
    FieldSpec::text("note"),
    FieldSpec::text("timestamp"),
    FieldSpec::number("duration"),
    FieldSpec::text("channel"),
];

const LEAD_REFS: &[RefSpec] = &[
    RefSpec::optional("assigned_to", EntityKind::User, "ASSIGNED_TO"),
    RefSpec::optional("account_id", EntityKind::Account, "BELONGS_TO"),
];

const OPPORTUNITY_REFS: &[RefSpec] = &[
    RefSpec::required("lead_id", EntityKind::Lead, "FOR_LEAD"),
    RefSpec::optional("account_id", EntityKind::Account, "BELONGS_TO"),
];

const DEAL_REFS: &[RefSpec] = &[
    RefSpec::required("opportunity_id", EntityKind::Opportunity, "FOR_OPPORTUNITY"),
    RefSpec::optional("account_id", EntityKind::Account, "BELONGS_TO"),
];

const ACTIVITY_REFS: &[RefSpec] = &[
    RefSpec::optional("lead_id", EntityKind::Lead, "FOR_LEAD"),
    RefSpec::optional("opportunity_id", EntityKind::Opportunity, "FOR_OPPORTUNITY"),
    RefSpec::optional("deal_id", EntityKind::Deal, "FOR_DEAL"),
];

impl EntityKind {
    /// All entity kinds, in route registration order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::User,
        EntityKind::Lead,
        EntityKind::Account,
        EntityKind::Opportunity,
        EntityKind::Deal,
        EntityKind::Activity,
    ];

    /// The Neo4j node label for this entity kind.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Account => "Account",
            EntityKind::Lead => "Lead",
            EntityKind::Opportunity => "Opportunity",
            EntityKind::Deal => "Deal",
            EntityKind::Activity => "Activity",
        }
    }

    /// The URL collection segment, e.g. `leads`.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Account => "accounts",
            EntityKind::Lead => "leads",
            EntityKind::Opportunity => "opportunities",
            EntityKind::Deal => "deals",
            EntityKind::Activity => "activities",
        }
    }

    /// Scalar attributes accepted by this kind.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            EntityKind::User => USER_FIELDS,
            EntityKind::Account => ACCOUNT_FIELDS,
            EntityKind::Lead => LEAD_FIELDS,
            EntityKind::Opportunity => OPPORTUNITY_FIELDS,
            EntityKind::Deal => DEAL_FIELDS,
            EntityKind::Activity => ACTIVITY_FIELDS,
        }
    }

    /// Reference slots stored as outgoing relationships.
    pub fn references(&self) -> &'static [RefSpec] {
        match self {
            EntityKind::User | EntityKind::Account => &[],
            EntityKind::Lead => LEAD_REFS,
            EntityKind::Opportunity => OPPORTUNITY_REFS,
            EntityKind::Deal => DEAL_REFS,
            EntityKind::Activity => ACTIVITY_REFS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn reference(&self, name: &str) -> Option<&'static RefSpec> {
        self.references().iter().find(|r| r.name == name)
    }

    /// Whether `search_name` applies, i.e. the kind has a `name` attribute.
    pub fn is_searchable(&self) -> bool {
        self.field("name").is_some()
    }

    /// Response columns in output order: `id`, scalar attributes, then references.
    pub fn columns(&self) -> Vec<&'static str> {
        std::iter::once("id")
            .chain(self.fields().iter().map(|f| f.name))
            .chain(self.references().iter().map(|r| r.name))
            .collect()
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
