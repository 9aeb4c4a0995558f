use thiserror::Error;

/// Errors raised while building a planning problem or applying actions.
///
/// Failing to find a plan is not an error; see [`crate::SearchOutcome`].
///
/// # Examples
///
/// ```
/// use craftplan::PlanError;
///
/// let error = PlanError::InvalidActionCost("punch for wood".to_string());
/// assert_eq!(
///     format!("{}", error),
///     "Action cost must be positive: punch for wood"
/// );
/// ```
#[derive(Error, Debug)]
pub enum PlanError {
    // Domain errors
    #[error("Invalid item name: {0:?}")]
    InvalidItemName(String),

    /// An action mentions an item outside the declared vocabulary
    #[error("Action {action} references unknown item: {item}")]
    UnknownItem { action: String, item: String },

    /// An action was declared with a zero cost
    #[error("Action cost must be positive: {0}")]
    InvalidActionCost(String),

    /// An action produces nothing
    #[error("Action produces no items: {0}")]
    NoProducts(String),

    /// Two actions share a name
    #[error("Action already in catalog: {0}")]
    DuplicateAction(String),

    #[error("Goal references unknown item: {0}")]
    UnknownGoalItem(String),

    #[error("Initial inventory references unknown item: {0}")]
    UnknownInitialItem(String),

    // Pruning configuration errors
    #[error("Pruning configuration references unknown item: {0}")]
    UnknownPruningItem(String),

    #[error("Pruning configuration references unknown action: {0}")]
    UnknownPruningAction(String),

    // Contract violations
    /// An effect was applied to a state that fails the action's precondition
    #[error("Action precondition not met: {0}")]
    PreconditionNotMet(String),

    /// An effect would push an item quantity past `u32::MAX`
    #[error("Action would overflow an item quantity: {0}")]
    QuantityOverflow(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Domain description error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, PlanError>;
