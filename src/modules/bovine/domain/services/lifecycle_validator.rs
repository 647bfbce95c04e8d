use crate::modules::bovine::domain::entities::bovine::{Bovine, BovineUpdate, NewBovine};
use crate::modules::bovine::domain::value_objects::{BovineStatus, Category, Sex};
use crate::shared::errors::{AppError, AppResult};

/// Rules governing which (category, sex, status) combinations a bovine may hold.
///
/// All checks are pure: nothing is loaded or persisted here.
pub struct LifecycleValidator;

impl LifecycleValidator {
    /// Check a bovine about to be registered.
    ///
    /// A bovine without category is accepted as is.
    pub fn validate_creation(candidate: &NewBovine) -> AppResult<()> {
        let Some(category) = candidate.category else {
            return Ok(());
        };

        Self::check_sex(category, candidate.sex)?;
        Self::check_status(category, candidate.status)
    }

    /// Check a partial update against the persisted bovine.
    ///
    /// Only what the update actually changes is checked, so a stored combination that no longer
    /// satisfies the rules can still receive unrelated edits.
    pub fn validate_update(proposed: &BovineUpdate, current: &Bovine) -> AppResult<()> {
        if !proposed.touches_lifecycle() {
            return Ok(());
        }

        if let (Some(from), Some(to)) = (current.category, proposed.category) {
            if !from.can_change_to(to) {
                return Err(AppError::ValidationError(format!(
                    "Cannot change category from {} to {}",
                    from, to
                )));
            }
        }

        let Some(category) = proposed.effective_category(current) else {
            return Ok(());
        };
        let sex = proposed.effective_sex(current);
        let status = proposed.effective_status(current);

        if sex != current.sex || Some(category) != current.category {
            Self::check_sex(category, sex)?;
        }

        if status != current.status {
            Self::check_status(category, status)?;
        }

        Ok(())
    }

    /// Dead or sold animals cannot take part in new operations.
    pub fn validate_for_usage(bovine: &Bovine) -> AppResult<()> {
        if bovine.status.is_final() {
            return Err(AppError::ValidationError(format!(
                "Bovine {} is {} and cannot be used",
                bovine.tag, bovine.status
            )));
        }
        Ok(())
    }

    fn check_sex(category: Category, sex: Sex) -> AppResult<()> {
        if category.accepts_sex(sex) {
            Ok(())
        } else {
            Err(AppError::ValidationError(format!(
                "{} is not allowed to be {}",
                category, sex
            )))
        }
    }

    fn check_status(category: Category, status: BovineStatus) -> AppResult<()> {
        if category.allows_status(status) {
            Ok(())
        } else {
            Err(AppError::ValidationError(format!(
                "{} is only allowed to be in the following states: {}",
                category,
                category.describe_allowed_statuses()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(category: Option<Category>, sex: Sex, status: BovineStatus) -> NewBovine {
        NewBovine {
            tag: "1234".to_string(),
            establishment_cuig: "312".to_string(),
            description: None,
            sex,
            category,
            status,
            tagging_date: None,
            birth_date: None,
            operation_id: None,
        }
    }

    fn stored(category: Option<Category>, sex: Sex, status: BovineStatus) -> Bovine {
        Bovine::new(candidate(category, sex, status))
    }

    fn message(result: AppResult<()>) -> String {
        match result {
            Err(AppError::ValidationError(msg)) => msg,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn creation_accepts_exactly_the_allowed_combinations() {
        for category in [Category::Calf, Category::Cow, Category::Bull] {
            for sex in [Sex::Male, Sex::Female] {
                for status in BovineStatus::ALL {
                    let expected = category.allows_status(status) && category.accepts_sex(sex);
                    let result =
                        LifecycleValidator::validate_creation(&candidate(Some(category), sex, status));
                    assert_eq!(result.is_ok(), expected, "{} {} {}", category, sex, status);
                }
            }
        }
    }

    #[test]
    fn promotion_keeps_an_unchanged_calf_status() {
        let weaned = stored(Some(Category::Calf), Sex::Female, BovineStatus::Destetado);
        let promote = BovineUpdate {
            category: Some(Category::Cow),
            ..Default::default()
        };

        assert!(!Category::Cow.allows_status(BovineStatus::Destetado));
        assert!(LifecycleValidator::validate_update(&promote, &weaned).is_ok());
    }

    #[test]
    fn update_without_lifecycle_fields_skips_every_check() {
        let legacy = stored(Some(Category::Bull), Sex::Female, BovineStatus::Prenada);
        let note = BovineUpdate {
            description: Some("checked by the vet".to_string()),
            ..Default::default()
        };

        assert!(LifecycleValidator::validate_update(&note, &legacy).is_ok());
    }

    #[test]
    fn female_bull_is_rejected() {
        let result = LifecycleValidator::validate_creation(&candidate(
            Some(Category::Bull),
            Sex::Female,
            BovineStatus::EnServicio,
        ));
        assert_eq!(message(result), "Bull is not allowed to be Female");
    }

    #[test]
    fn nursing_cow_is_rejected_with_the_allowed_list() {
        let result = LifecycleValidator::validate_creation(&candidate(
            Some(Category::Cow),
            Sex::Female,
            BovineStatus::Mamando,
        ));
        assert_eq!(
            message(result),
            "Cow is only allowed to be in the following states: [Sin preñez, Preñada, Muerto, Vendido]"
        );
    }

    #[test]
    fn sex_is_checked_before_status() {
        let result = LifecycleValidator::validate_creation(&candidate(
            Some(Category::Cow),
            Sex::Male,
            BovineStatus::EnServicio,
        ));
        assert_eq!(message(result), "Cow is not allowed to be Male");
    }

    #[test]
    fn uncategorized_bovines_skip_every_check() {
        let result = LifecycleValidator::validate_creation(&candidate(
            None,
            Sex::Male,
            BovineStatus::Prenada,
        ));
        assert!(result.is_ok());
    }

    #[test]
    fn description_only_update_never_fails() {
        // Legacy row holding an illegal combination.
        let current = stored(Some(Category::Cow), Sex::Male, BovineStatus::Mamando);
        let update = BovineUpdate {
            description: Some("moved to the north field".to_string()),
            ..Default::default()
        };
        assert!(LifecycleValidator::validate_update(&update, &current).is_ok());
    }

    #[test]
    fn cow_cannot_become_bull() {
        let current = stored(Some(Category::Cow), Sex::Female, BovineStatus::Prenada);
        let update = BovineUpdate {
            category: Some(Category::Bull),
            ..Default::default()
        };
        assert_eq!(
            message(LifecycleValidator::validate_update(&update, &current)),
            "Cannot change category from Cow to Bull"
        );
    }

    #[test]
    fn calf_grows_into_a_cow() {
        let current = stored(Some(Category::Calf), Sex::Female, BovineStatus::Destetado);
        let update = BovineUpdate {
            category: Some(Category::Cow),
            status: Some(BovineStatus::SinPrenez),
            ..Default::default()
        };
        assert!(LifecycleValidator::validate_update(&update, &current).is_ok());
    }

    #[test]
    fn male_calf_cannot_become_a_cow() {
        let current = stored(Some(Category::Calf), Sex::Male, BovineStatus::Destetado);
        let update = BovineUpdate {
            category: Some(Category::Cow),
            ..Default::default()
        };
        assert_eq!(
            message(LifecycleValidator::validate_update(&update, &current)),
            "Cow is not allowed to be Male"
        );
    }

    #[test]
    fn same_category_is_not_a_change() {
        let current = stored(Some(Category::Bull), Sex::Male, BovineStatus::EnServicio);
        let update = BovineUpdate {
            category: Some(Category::Bull),
            status: Some(BovineStatus::FueraDeServicio),
            ..Default::default()
        };
        assert!(LifecycleValidator::validate_update(&update, &current).is_ok());
    }

    #[test]
    fn new_status_must_fit_the_effective_category() {
        let current = stored(Some(Category::Bull), Sex::Male, BovineStatus::EnServicio);
        let update = BovineUpdate {
            status: Some(BovineStatus::Prenada),
            ..Default::default()
        };
        assert_eq!(
            message(LifecycleValidator::validate_update(&update, &current)),
            "Bull is only allowed to be in the following states: [En servicio, Fuera de servicio, Muerto, Vendido]"
        );
    }

    #[test]
    fn unchanged_status_is_tolerated() {
        let current = stored(Some(Category::Cow), Sex::Female, BovineStatus::Mamando);
        let update = BovineUpdate {
            status: Some(BovineStatus::Mamando),
            ..Default::default()
        };
        assert!(LifecycleValidator::validate_update(&update, &current).is_ok());
    }

    #[test]
    fn changing_sex_of_a_cow_is_rejected() {
        let current = stored(Some(Category::Cow), Sex::Female, BovineStatus::Prenada);
        let update = BovineUpdate {
            sex: Some(Sex::Male),
            ..Default::default()
        };
        assert_eq!(
            message(LifecycleValidator::validate_update(&update, &current)),
            "Cow is not allowed to be Male"
        );
    }

    #[test]
    fn uncategorized_bovine_may_take_any_category() {
        let current = stored(None, Sex::Male, BovineStatus::EnServicio);
        let update = BovineUpdate {
            category: Some(Category::Bull),
            ..Default::default()
        };
        assert!(LifecycleValidator::validate_update(&update, &current).is_ok());
    }

    #[test]
    fn dead_or_sold_bovines_cannot_be_used() {
        let sold = stored(Some(Category::Cow), Sex::Female, BovineStatus::Vendido);
        assert_eq!(
            message(LifecycleValidator::validate_for_usage(&sold)),
            "Bovine 1234 is Vendido and cannot be used"
        );

        let alive = stored(Some(Category::Cow), Sex::Female, BovineStatus::Prenada);
        assert!(LifecycleValidator::validate_for_usage(&alive).is_ok());
    }
}
