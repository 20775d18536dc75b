use super::collaborators::{GradeItemCatalog, Localizer, ModuleRuleProvider};
use super::form::{Dependency, FormError, FormField, FormFieldSink, Operator, SelectOption};
use super::types::{fields, ActivityCompletionCapabilities, CompletionTrackingMode, FieldErrors, SubmittedData};

/// Which host field decides whether a grade can exist at all.
///
/// Ratings and the other grade field types are wired to different host
/// fields; the two paths stay separate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassGradeGate {
    /// No grade unless ratings are assessed.
    Rating,
    /// No grade when `{field}[modgrade_type]` is "none".
    GradeType { field: String },
}

impl PassGradeGate {
    pub fn dependency(&self) -> Dependency {
        match self {
            PassGradeGate::Rating => Dependency::new(fields::ASSESSED, Operator::Eq, "0"),
            PassGradeGate::GradeType { field } => {
                Dependency::new(&format!("{field}[modgrade_type]"), Operator::Eq, "none")
            }
        }
    }
}

/// Grade fields emitted for an activity, by number of gradable items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeFieldLayout {
    None,
    SingleItem { item_number: i64, gate: PassGradeGate },
    MultiItem { item_numbers: Vec<i64> },
}

/// A submitted grade requirement. Never built for zero gradable items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeCompletionSelection {
    SingleItem { use_grade: bool, use_pass_grade: bool },
    MultiItem { selected_item_number: Option<i64>, use_pass_grade: bool },
}

impl GradeCompletionSelection {
    pub fn from_submission(layout: &GradeFieldLayout, data: &SubmittedData) -> Option<Self> {
        let use_pass_grade = data.is_set(fields::PASS_GRADE);
        match layout {
            GradeFieldLayout::None => None,
            GradeFieldLayout::SingleItem { .. } => Some(GradeCompletionSelection::SingleItem {
                use_grade: data.is_set(fields::USE_GRADE),
                use_pass_grade,
            }),
            GradeFieldLayout::MultiItem { item_numbers } => {
                let selected_item_number = data
                    .get(fields::GRADE_ITEM_NUMBER)
                    .and_then(|v| v.trim().parse::<i64>().ok())
                    .filter(|n| item_numbers.contains(n));
                Some(GradeCompletionSelection::MultiItem { selected_item_number, use_pass_grade })
            }
        }
    }

    pub fn requires_grade(&self) -> bool {
        match self {
            GradeCompletionSelection::SingleItem { use_grade, use_pass_grade } => *use_grade || *use_pass_grade,
            GradeCompletionSelection::MultiItem { selected_item_number, .. } => selected_item_number.is_some(),
        }
    }
}

/// What `build_field_set` decided, besides the fields it added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionFieldLayout {
    pub default_mode: CompletionTrackingMode,
    pub auto_completion_possible: bool,
    pub grade_fields: GradeFieldLayout,
    /// Fields added by the module's own rules; frozen with the rest when locked.
    pub custom_fields: Vec<String>,
}

/// Adds the completion section to an activity settings form and checks
/// what comes back. Stateless; callers compose one per request.
pub struct CompletionRuleConfigurator<'a> {
    grade_items: &'a dyn GradeItemCatalog,
    rules: &'a dyn ModuleRuleProvider,
    strings: &'a dyn Localizer,
}

impl<'a> CompletionRuleConfigurator<'a> {
    pub fn new(
        grade_items: &'a dyn GradeItemCatalog,
        rules: &'a dyn ModuleRuleProvider,
        strings: &'a dyn Localizer,
    ) -> Self {
        Self { grade_items, rules, strings }
    }

    fn s(&self, key: &str) -> String {
        self.strings.get_string(key, "completion", None)
    }

    pub fn build_field_set(
        &self,
        form: &mut dyn FormFieldSink,
        caps: &ActivityCompletionCapabilities,
    ) -> Result<CompletionFieldLayout, FormError> {
        // Removed again by the lock step when nobody has progress yet.
        form.add_field(FormField::no_submit_button(fields::UNLOCK_BUTTON, self.s("unlockcompletion")));
        form.add_field(FormField::hidden(fields::UNLOCKED, "0"));

        let default_mode = caps.default_mode();
        let automatic = CompletionTrackingMode::Automatic.form_value();

        form.add_field(
            FormField::select(
                fields::COMPLETION,
                self.s("completion"),
                vec![
                    SelectOption::new(CompletionTrackingMode::None.form_value(), self.s("completion_none")),
                    SelectOption::new(CompletionTrackingMode::Manual.form_value(), self.s("completion_manual")),
                ],
            )
            .with_help("completion"),
        );
        form.set_default(fields::COMPLETION, &default_mode.form_value())?;

        let mut auto_completion_possible = false;

        if caps.supports_views {
            form.add_field(FormField::checkbox(
                fields::VIEW,
                self.s("completionview"),
                self.s("completionview_desc"),
            ));
            form.hide_if(fields::VIEW, Dependency::new(fields::COMPLETION, Operator::Ne, &automatic))?;
            if default_mode == CompletionTrackingMode::Automatic {
                form.set_default(fields::VIEW, "1")?;
            }
            auto_completion_possible = true;
        }

        let grade_fields = if caps.supports_grades {
            auto_completion_possible = true;
            self.build_grade_fields(form, &caps.module_name, caps.supports_rating)?
        } else {
            GradeFieldLayout::None
        };

        let custom_fields = self.rules.add_custom_completion_fields(form)?;
        for name in &custom_fields {
            form.hide_if(name, Dependency::new(fields::COMPLETION, Operator::Ne, &automatic))?;
        }
        auto_completion_possible = auto_completion_possible || !custom_fields.is_empty();

        if auto_completion_possible {
            form.add_option(fields::COMPLETION, SelectOption::new(automatic, self.s("completion_automatic")))?;
        }

        form.add_field(
            FormField::date_time(fields::EXPECTED, self.s("completionexpected"), true).with_help("completionexpected"),
        );
        form.hide_if(
            fields::EXPECTED,
            Dependency::new(fields::COMPLETION, Operator::Eq, &CompletionTrackingMode::None.form_value()),
        )?;

        log::debug!(
            "Completion fields for mod_{}: default={:?} automatic={} custom={}",
            caps.module_name,
            default_mode,
            auto_completion_possible,
            custom_fields.len()
        );

        Ok(CompletionFieldLayout { default_mode, auto_completion_possible, grade_fields, custom_fields })
    }

    /// Grade requirement fields. Nothing for zero grade items, checkboxes
    /// for one, an item select for more.
    pub fn build_grade_fields(
        &self,
        form: &mut dyn FormFieldSink,
        module_name: &str,
        rating: bool,
    ) -> Result<GradeFieldLayout, FormError> {
        let component = format!("mod_{module_name}");
        let mode_field_exists = form.has_field(fields::COMPLETION);
        let automatic = CompletionTrackingMode::Automatic.form_value();
        let hide_unless_automatic = Dependency::new(fields::COMPLETION, Operator::Ne, &automatic);
        let item_names = self.grade_items.item_name_mapping(&component);

        if item_names.len() == 1 {
            let item_number = *item_names.keys().next().unwrap_or(&0);

            form.add_field(
                FormField::checkbox(fields::USE_GRADE, self.s("completionusegrade"), self.s("completionusegrade_desc"))
                    .with_help("completionusegrade"),
            );
            form.add_field(
                FormField::checkbox(fields::PASS_GRADE, "", self.s("completionpassgrade_desc"))
                    .with_help("completionpassgrade"),
            );
            form.disable_if(fields::PASS_GRADE, Dependency::not_checked(fields::USE_GRADE))?;

            if mode_field_exists {
                form.hide_if(fields::PASS_GRADE, hide_unless_automatic.clone())?;
                form.hide_if(fields::USE_GRADE, hide_unless_automatic)?;
            }

            let gate = if rating {
                PassGradeGate::Rating
            } else {
                PassGradeGate::GradeType {
                    field: self.grade_items.field_name(&component, item_number, "grade"),
                }
            };
            form.disable_if(fields::USE_GRADE, gate.dependency())?;
            form.disable_if(fields::PASS_GRADE, gate.dependency())?;

            Ok(GradeFieldLayout::SingleItem { item_number, gate })
        } else if item_names.len() > 1 {
            let mut options = vec![SelectOption::new("", self.s("activitygradenotrequired"))];
            for (item_number, item_name) in &item_names {
                let label = self.strings.get_string(&format!("grade_{item_name}_name"), &component, None);
                options.push(SelectOption::new(item_number.to_string(), label));
            }

            form.add_field(FormField::select(fields::GRADE_ITEM_NUMBER, self.s("completionusegrade"), options));
            form.add_field(
                FormField::checkbox(fields::PASS_GRADE, "", self.s("completionpassgrade_desc"))
                    .with_help("completionpassgrade"),
            );
            form.disable_if(fields::PASS_GRADE, Dependency::new(fields::GRADE_ITEM_NUMBER, Operator::Eq, ""))?;

            if mode_field_exists {
                form.hide_if(fields::GRADE_ITEM_NUMBER, hide_unless_automatic.clone())?;
                form.hide_if(fields::PASS_GRADE, hide_unless_automatic)?;
            }

            Ok(GradeFieldLayout::MultiItem { item_numbers: item_names.keys().copied().collect() })
        } else {
            Ok(GradeFieldLayout::None)
        }
    }

    /// Automatic completion needs at least one requirement. Locked settings
    /// are not re-checked since their fields are read-only. `unlocked` is the
    /// lock state decided for this request, not the submitted hidden flag.
    pub fn validate(&self, data: &SubmittedData, unlocked: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let automatic = data.mode() == Some(CompletionTrackingMode::Automatic);
        if !automatic || !unlocked {
            return errors;
        }

        let mut rules_enabled = data.is_set(fields::VIEW)
            || data.is_set(fields::USE_GRADE)
            || data.is_set(fields::PASS_GRADE);

        if !rules_enabled {
            if let Some(item) = data.get(fields::GRADE_ITEM_NUMBER) {
                rules_enabled = !item.is_empty();
            }
        }

        rules_enabled = rules_enabled || self.rules.is_rule_satisfied(data);

        if !rules_enabled {
            errors.insert(fields::COMPLETION.to_string(), self.s("badautocompletion"));
        }
        errors
    }
}
