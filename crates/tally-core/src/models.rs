//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
///
/// The password hash is never part of this struct; it stays inside the
/// storage layer (`StoredCredentials`) so it cannot leak through an API
/// response by accident.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User role, checked as a capability rather than by comparing emails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a user (password already hashed by the caller)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// A user together with the stored password hash, for login verification only
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Whether a transaction adds to or subtracts from the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment method used for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Cash")]
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::CreditCard => "Credit Card",
            Self::Cash => "Cash",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "UPI" => Ok(Self::Upi),
            "Credit Card" => Ok(Self::CreditCard),
            "Cash" => Ok(Self::Cash),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense record belonging to one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or replacing a transaction
///
/// `payment_method` is optional at the deserialization layer so the handler
/// can reject its absence with a 400 instead of a generic parse error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
    /// Defaults to today when omitted
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    pub payment_method: Option<PaymentMethod>,
}

/// A user-defined transaction category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or replacing a category
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub color: Option<String>,
}

/// Budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Weekly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending limit for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or replacing a budget
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
}

/// A budget decorated with the amount spent in the current month
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWithSpent {
    #[serde(flatten)]
    pub budget: Budget,
    pub spent: f64,
}

/// A saving goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDate,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or replacing a goal
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub deadline: NaiveDate,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// One row of the admin user listing: a user with current-month totals
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMonthlySummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub total_income: f64,
    pub total_expense: f64,
}
