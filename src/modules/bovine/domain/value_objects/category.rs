use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{BovineStatus, Sex};
use crate::shared::errors::AppError;

const CALF_STATUSES: [BovineStatus; 4] = [
    BovineStatus::Mamando,
    BovineStatus::Destetado,
    BovineStatus::Muerto,
    BovineStatus::Vendido,
];

const COW_STATUSES: [BovineStatus; 4] = [
    BovineStatus::SinPrenez,
    BovineStatus::Prenada,
    BovineStatus::Muerto,
    BovineStatus::Vendido,
];

const BULL_STATUSES: [BovineStatus; 4] = [
    BovineStatus::EnServicio,
    BovineStatus::FueraDeServicio,
    BovineStatus::Muerto,
    BovineStatus::Vendido,
];

/// Life-stage classification of a bovine.
///
/// A calf is the only category that may later become something else; cows and bulls keep
/// their category for good.
#[derive(diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[ExistingTypePath = "crate::schema::sql_types::BovineCategory"]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Calf,
    Cow,
    Bull,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Calf => "Calf",
            Category::Cow => "Cow",
            Category::Bull => "Bull",
        }
    }

    pub fn allowed_statuses(&self) -> &'static [BovineStatus] {
        match self {
            Category::Calf => &CALF_STATUSES,
            Category::Cow => &COW_STATUSES,
            Category::Bull => &BULL_STATUSES,
        }
    }

    pub fn allows_status(&self, status: BovineStatus) -> bool {
        self.allowed_statuses().contains(&status)
    }

    pub fn accepts_sex(&self, sex: Sex) -> bool {
        match self {
            Category::Calf => true,
            Category::Cow => sex == Sex::Female,
            Category::Bull => sex == Sex::Male,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Category::Calf)
    }

    pub fn can_change_to(&self, target: Category) -> bool {
        *self == target || !self.is_terminal()
    }

    /// Allowed statuses rendered as `[A, B, C]`.
    pub fn describe_allowed_statuses(&self) -> String {
        let names: Vec<&str> = self
            .allowed_statuses()
            .iter()
            .map(BovineStatus::display_name)
            .collect();
        format!("[{}]", names.join(", "))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calf" | "ternero" => Ok(Category::Calf),
            "cow" | "vaca" => Ok(Category::Cow),
            "bull" | "toro" => Ok(Category::Bull),
            _ => Err(AppError::InvalidInput(format!("Unknown category: {}", s))),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.display_name().to_string()
    }
}
