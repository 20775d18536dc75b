use std::collections::HashMap;

use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::completion::{
    plan_submit, rules, CompletionDisplayDecision, CompletionFieldLayout, CompletionFieldSet,
    CompletionLockDecision, CompletionLockState, CompletionRuleConfigurator, EnglishStrings, FieldErrors,
    GradeItemMapping, SubmitAction, SubmittedData,
};
use crate::errors::{AppError, render};
use crate::models::activity::{self, Activity};
use crate::models::course::{self, Course};
use crate::models::{completion_state, grade_item, setting};
use crate::templates_structs::{CompletionFormTemplate, CompletionInfoTemplate, FieldView, PageContext};

#[derive(Deserialize)]
pub struct InfoQuery {
    pub user_id: i64,
}

/// The completion section built for one request.
struct BuiltForm {
    form: CompletionFieldSet,
    layout: CompletionFieldLayout,
    catalog: GradeItemMapping,
    lock: Option<CompletionLockDecision>,
}

async fn load(pool: &PgPool, course_id: i64, cm_id: i64) -> Result<(Course, Activity), AppError> {
    let course = course::find_by_id(pool, course_id).await?.ok_or(AppError::NotFound)?;
    let activity = activity::find_by_id(pool, course_id, cm_id).await?.ok_or(AppError::NotFound)?;
    Ok((course, activity))
}

async fn build_form(
    pool: &PgPool,
    course: &Course,
    activity: &Activity,
    submission: SubmittedData,
) -> Result<BuiltForm, AppError> {
    let system_default = setting::get_bool(pool, "completion.default_enabled", true).await;
    let caps = activity.capabilities(system_default);
    let catalog = grade_item::load_mapping(pool, &caps.component()).await?;
    let strings = EnglishStrings;

    let mut form = CompletionFieldSet::with_submission(submission);
    let layout = {
        let module_rules = rules::provider_for(&activity.modname, &strings);
        let configurator = CompletionRuleConfigurator::new(&catalog, module_rules.as_ref(), &strings);
        configurator.build_field_set(&mut form, &caps)?
    };

    // Count after every field exists, so the freeze sees this request's form.
    let progress = completion_state::progress_snapshot(pool, activity.id).await?;
    let lock = CompletionLockState::new(&strings).lock_after_data(
        &mut form,
        course.enable_completion,
        Some(activity.id),
        &progress,
        &layout.custom_fields,
    )?;

    Ok(BuiltForm { form, layout, catalog, lock })
}

fn form_page(
    ctx: PageContext,
    course: &Course,
    activity: &Activity,
    built: &BuiltForm,
    errors: &FieldErrors,
) -> Result<HttpResponse, AppError> {
    let tmpl = CompletionFormTemplate {
        ctx,
        course_name: course.fullname.clone(),
        activity_name: activity.name.clone(),
        form_action: format!("/courses/{}/modules/{}/completion", course.id, activity.id),
        fields: FieldView::from_field_set(&built.form, errors),
        locked: built.lock.as_ref().is_some_and(CompletionLockDecision::is_locked),
    };
    render(tmpl)
}

/// GET /courses/{course_id}/modules/{cm_id}/completion
pub async fn edit_form(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (course_id, cm_id) = path.into_inner();
    let (course, activity) = load(&pool, course_id, cm_id).await?;

    let stored = activity.completion_settings().to_form_values();
    let built = build_form(&pool, &course, &activity, stored).await?;

    let ctx = PageContext::build(&session, &pool, &format!("/courses/{course_id}/modules/{cm_id}/completion")).await;
    form_page(ctx, &course, &activity, &built, &FieldErrors::new())
}

/// POST /courses/{course_id}/modules/{cm_id}/completion
pub async fn submit(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(i64, i64)>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let (course_id, cm_id) = path.into_inner();
    let (course, activity) = load(&pool, course_id, cm_id).await?;
    let data = SubmittedData::from(form.into_inner());
    let current_path = format!("/courses/{course_id}/modules/{cm_id}/completion");

    let built = build_form(&pool, &course, &activity, data.clone()).await?;
    let previous = activity.completion_settings();

    let strings = EnglishStrings;
    let action = {
        let module_rules = rules::provider_for(&activity.modname, &strings);
        let configurator = CompletionRuleConfigurator::new(&built.catalog, module_rules.as_ref(), &strings);
        plan_submit(&configurator, &data, &built.layout, built.lock.as_ref(), &previous)
    };

    let plan = match action {
        SubmitAction::Redisplay => {
            log::info!("Completion settings unlocked for cm {cm_id}");
            let ctx = PageContext::build(&session, &pool, &current_path).await;
            return form_page(ctx, &course, &activity, &built, &FieldErrors::new());
        }
        SubmitAction::Rejected(errors) => {
            log::debug!("Completion settings for cm {cm_id} rejected: {errors:?}");
            let ctx = PageContext::build(&session, &pool, &current_path).await;
            return form_page(ctx, &course, &activity, &built, &errors);
        }
        SubmitAction::Save(plan) => plan,
    };

    activity::save_completion(&pool, cm_id, &plan.settings).await?;

    if plan.reset_progress {
        let erased = completion_state::reset_all_for_module(&pool, cm_id).await?;
        log::info!("Completion rules changed for cm {cm_id}, erased {erased} progress record(s)");
    }

    log::info!("Saved completion settings for cm {cm_id}: mode={:?}", plan.settings.mode);
    session
        .insert("flash", "Completion settings saved")
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", current_path))
        .finish())
}

/// GET /courses/{course_id}/modules/{cm_id}/completion/info?user_id=
/// Completion and dates block of one activity for one user.
pub async fn info(
    pool: web::Data<PgPool>,
    path: web::Path<(i64, i64)>,
    query: web::Query<InfoQuery>,
) -> Result<HttpResponse, AppError> {
    let (course_id, cm_id) = path.into_inner();
    let user_id = query.user_id;
    if user_id <= 0 {
        return Err(AppError::BadRequest("user_id must be positive".to_string()));
    }
    let (course, activity) = load(&pool, course_id, cm_id).await?;

    let details = if course.enable_completion {
        let state = completion_state::find_for_user(&pool, cm_id, user_id).await?;
        completion_state::details_for(&activity.completion_settings(), state.as_ref())
    } else {
        Default::default()
    };
    let tracked = completion_state::is_tracked_user(&pool, course_id, user_id).await?;

    let strings = EnglishStrings;
    let dates = activity::activity_dates(&activity, &strings);
    let snapshot = CompletionDisplayDecision::new(&strings).decide(&details, dates, tracked, course.display_settings());

    match snapshot {
        Some(info) => render(CompletionInfoTemplate { activity_name: activity.name.clone(), info }),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}
