use uuid::Uuid;
use taskboard_common::{Identity, Role, TaskboardError};

/// Catalog management (users, groups, task CRUD) is teacher-only.
pub fn ensure_teacher(actor: &Identity) -> Result<(), TaskboardError> {
    if actor.role.is_teacher() {
        Ok(())
    } else {
        Err(TaskboardError::PermissionDenied)
    }
}

/// Teachers may move any task; leaders only tasks assigned to their own
/// group. Regular members may not change task status at all.
pub fn ensure_can_set_status(actor: &Identity, task_group: Uuid) -> Result<(), TaskboardError> {
    match actor.role {
        Role::Teacher => Ok(()),
        Role::Leader if actor.group_id == Some(task_group) => Ok(()),
        _ => Err(TaskboardError::PermissionDenied),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role, group_id: Option<Uuid>) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            role,
            email: "someone@example.com".into(),
            full_name: "Someone".into(),
            group_id,
        }
    }

    #[test]
    fn teacher_can_touch_any_group() {
        let actor = identity(Role::Teacher, None);
        assert!(ensure_teacher(&actor).is_ok());
        assert!(ensure_can_set_status(&actor, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn leader_is_confined_to_own_group() {
        let own = Uuid::new_v4();
        let actor = identity(Role::Leader, Some(own));
        assert!(ensure_can_set_status(&actor, own).is_ok());
        assert!(matches!(
            ensure_can_set_status(&actor, Uuid::new_v4()),
            Err(TaskboardError::PermissionDenied)
        ));
        assert!(matches!(
            ensure_teacher(&actor),
            Err(TaskboardError::PermissionDenied)
        ));
    }

    #[test]
    fn normal_member_cannot_change_status() {
        let own = Uuid::new_v4();
        let actor = identity(Role::Normal, Some(own));
        assert!(matches!(
            ensure_can_set_status(&actor, own),
            Err(TaskboardError::PermissionDenied)
        ));
    }
}
