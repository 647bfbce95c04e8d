/// Test data factories using builder pattern
///
/// Provides convenient methods to create test data with sensible defaults
use bovine_registry::modules::batch::NewBatch;
use bovine_registry::modules::bovine::{BovineStatus, Category, NewBovine, Sex};
use chrono::NaiveDate;
use uuid::Uuid;

pub const CUIG: &str = "312";
pub const OTHER_CUIG: &str = "999";

pub struct BovineFactory {
    tag: String,
    establishment_cuig: String,
    description: Option<String>,
    sex: Sex,
    category: Option<Category>,
    status: BovineStatus,
    tagging_date: Option<NaiveDate>,
    birth_date: Option<NaiveDate>,
    operation_id: Option<Uuid>,
}

impl Default for BovineFactory {
    fn default() -> Self {
        Self {
            tag: "AR-0001".to_string(),
            establishment_cuig: CUIG.to_string(),
            description: None,
            sex: Sex::Female,
            category: Some(Category::Cow),
            status: BovineStatus::SinPrenez,
            tagging_date: None,
            birth_date: None,
            operation_id: None,
        }
    }
}

impl BovineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cow(tag: &str) -> Self {
        Self::default().with_tag(tag)
    }

    pub fn bull(tag: &str) -> Self {
        Self::default()
            .with_tag(tag)
            .with_sex(Sex::Male)
            .with_category(Category::Bull)
            .with_status(BovineStatus::EnServicio)
    }

    pub fn calf(tag: &str, sex: Sex) -> Self {
        Self::default()
            .with_tag(tag)
            .with_sex(sex)
            .with_category(Category::Calf)
            .with_status(BovineStatus::Mamando)
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    pub fn with_cuig(mut self, cuig: &str) -> Self {
        self.establishment_cuig = cuig.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn without_category(mut self) -> Self {
        self.category = None;
        self
    }

    pub fn with_status(mut self, status: BovineStatus) -> Self {
        self.status = status;
        self
    }

    pub fn born_on(mut self, year: i32, month: u32, day: u32) -> Self {
        self.birth_date = NaiveDate::from_ymd_opt(year, month, day);
        self
    }

    pub fn with_operation(mut self, operation_id: Uuid) -> Self {
        self.operation_id = Some(operation_id);
        self
    }

    pub fn build(self) -> NewBovine {
        NewBovine {
            tag: self.tag,
            establishment_cuig: self.establishment_cuig,
            description: self.description,
            sex: self.sex,
            category: self.category,
            status: self.status,
            tagging_date: self.tagging_date,
            birth_date: self.birth_date,
            operation_id: self.operation_id,
        }
    }
}

pub struct BatchFactory {
    batch_name: String,
    establishment_cuig: String,
    description: Option<String>,
    bovine_tags: Vec<String>,
}

impl BatchFactory {
    pub fn named(name: &str) -> Self {
        Self {
            batch_name: name.to_string(),
            establishment_cuig: CUIG.to_string(),
            description: None,
            bovine_tags: Vec::new(),
        }
    }

    pub fn with_cuig(mut self, cuig: &str) -> Self {
        self.establishment_cuig = cuig.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.bovine_tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn build(self) -> NewBatch {
        NewBatch {
            batch_name: self.batch_name,
            establishment_cuig: self.establishment_cuig,
            description: self.description,
            bovine_tags: self.bovine_tags,
        }
    }
}

pub fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}
