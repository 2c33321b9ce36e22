//! Error types for the orbforge-core crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Every failure is detected before the caller's inventory could be
//! affected: the resolver validates, then works on its own copy.

use orbforge_types::{DropOutcome, Tier};

/// Errors raised while building or expanding a recipe graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    /// A recipe was supplied for the base tier, which can only be acquired.
    #[error("the base tier {0} cannot have a recipe")]
    BaseTierHasRecipe(Tier),

    /// A recipe lists no components.
    #[error("recipe for {0} has no components")]
    EmptyRecipe(Tier),

    /// A component is listed with a quantity of zero.
    #[error("recipe for {tier} lists zero of component {component}")]
    ZeroQuantity {
        /// The tier whose recipe is malformed.
        tier: Tier,
        /// The component with the zero quantity.
        component: Tier,
    },

    /// A component is neither the base tier nor craftable.
    #[error("recipe for {tier} needs {component}, which has no recipe and is not the base tier")]
    DanglingComponent {
        /// The tier whose recipe references the unknown component.
        tier: Tier,
        /// The component that cannot be obtained.
        component: Tier,
    },

    /// A component is not strictly below the tier it is used to craft.
    #[error("recipe for {tier} needs {component}, which is not a lower tier")]
    NotTiered {
        /// The tier whose recipe breaks the ordering.
        tier: Tier,
        /// The offending component.
        component: Tier,
    },

    /// The tier is neither the base tier nor craftable in this graph.
    #[error("unknown tier: {0}")]
    UnknownTier(Tier),

    /// An arithmetic overflow occurred while expanding a recipe.
    #[error("arithmetic overflow in recipe expansion: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}

/// Errors raised by the production plan resolver and its input validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The target tier is neither in the recipe graph nor the base tier.
    #[error("invalid target: {0} is not a known tier")]
    InvalidTarget(Tier),

    /// A target count or opening count is negative or not an integer.
    #[error("invalid {field}: {value:?} ({reason})")]
    InvalidQuantity {
        /// Which input was rejected (for example `"target count"`).
        field: &'static str,
        /// The rejected input as supplied.
        value: String,
        /// Why the input was rejected.
        reason: &'static str,
    },

    /// An inventory entry holds a negative count.
    #[error("malformed inventory: {tier} has negative count {count}")]
    MalformedInventory {
        /// The tier with the bad count.
        tier: Tier,
        /// The count as supplied.
        count: i64,
    },

    /// A non-base tier was demanded during expansion but has no recipe.
    #[error("{tier} is needed ({missing} missing) but cannot be crafted")]
    Uncraftable {
        /// The tier that has no recipe.
        tier: Tier,
        /// How many units could not be covered by inventory.
        missing: u64,
    },

    /// An arithmetic overflow occurred while propagating demand.
    #[error("arithmetic overflow in plan resolution: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}

/// Errors raised while building a drop table or estimating egg counts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropError {
    /// The table lists no outcomes at all.
    #[error("drop table is empty")]
    EmptyTable,

    /// The same outcome appears more than once.
    #[error("drop table lists {0:?} more than once")]
    DuplicateOutcome(DropOutcome),

    /// No item outcome has a positive weight, so openings can never yield orbs.
    #[error("drop table has no item outcome with a positive weight")]
    NoItemOutcomes,

    /// The weights were rejected by the sampler.
    #[error("invalid drop weights: {reason}")]
    InvalidWeights {
        /// Description of why the weights were rejected.
        reason: String,
    },

    /// An item outcome refers to a tier the recipe graph does not know.
    #[error("drop table refers to a tier unknown to the recipe graph: {source}")]
    Recipe {
        /// The underlying recipe error.
        #[from]
        source: RecipeError,
    },

    /// An arithmetic overflow occurred while computing expected values.
    #[error("arithmetic overflow in drop computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
