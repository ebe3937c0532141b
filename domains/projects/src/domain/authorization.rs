//! Who may move a project where, and who may see it

use lingodesk_common::{Actor, Error, Result, UserRole};

use super::entities::Project;
use super::state::ProjectState;

/// Check that `actor` may move `project` to `target`
pub fn authorize_transition(actor: &Actor, project: &Project, target: ProjectState) -> Result<()> {
    let allowed = match target {
        ProjectState::Completed => actor.is(UserRole::Translator, project.translator_id),
        ProjectState::Approved | ProjectState::Rejected => {
            actor.is(UserRole::Customer, Some(project.customer_id))
        }
        ProjectState::Closed => actor.is_admin(),
        ProjectState::Assigned => {
            actor.is_admin() || actor.is(UserRole::Translator, project.translator_id)
        }
        ProjectState::Created => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(Error::Forbidden(format!(
            "{} {} may not move project {} to {}",
            actor.role, actor.id, project.id, target
        )))
    }
}

/// True when `actor` may read `project` and its files
pub fn can_view(actor: &Actor, project: &Project) -> bool {
    actor.is_admin()
        || actor.is(UserRole::Customer, Some(project.customer_id))
        || actor.is(UserRole::Translator, project.translator_id)
}

/// Fail with `Forbidden` unless `actor` may read `project`
pub fn ensure_can_view(actor: &Actor, project: &Project) -> Result<()> {
    if can_view(actor, project) {
        Ok(())
    } else {
        Err(Error::Forbidden(format!(
            "project {} is not visible to {}",
            project.id, actor.id
        )))
    }
}
