use std::collections::BTreeSet;
use std::sync::Arc;

use warden_application::{
    AccessAssociationRepository, AccessCatalogRepository, AccessItemInput, AccessService,
    Association, Relation,
};
use warden_core::AppError;
use warden_domain::{
    AccessCollection, AccessName, AccessReferences, AccessSubject, LookupColumn, MatchMode,
    Permission, PermissionId, Role, RoleId,
};

use super::InMemoryAccessRepository;

fn item(name: &str) -> AccessItemInput {
    AccessItemInput {
        name: AccessName::new(name).unwrap_or_else(|_| unreachable!()),
        fullname: None,
        description: None,
    }
}

async fn role(repository: &InMemoryAccessRepository, name: &str) -> i64 {
    repository
        .create_role(item(name))
        .await
        .map(|role| role.id().as_i64())
        .unwrap_or_default()
}

async fn permission(repository: &InMemoryAccessRepository, name: &str) -> i64 {
    repository
        .create_permission(item(name))
        .await
        .map(|permission| permission.id().as_i64())
        .unwrap_or_default()
}

#[tokio::test]
async fn duplicate_names_conflict_per_collection() {
    let repository = InMemoryAccessRepository::new();

    assert!(repository.create_role(item("admin")).await.is_ok());
    assert!(matches!(
        repository.create_role(item("admin")).await,
        Err(AppError::Conflict(_))
    ));
    assert!(repository.create_permission(item("admin")).await.is_ok());
}

#[tokio::test]
async fn lists_are_ordered_by_name() {
    let repository = InMemoryAccessRepository::new();
    for name in ["viewer", "admin", "editor"] {
        role(&repository, name).await;
    }

    let names: Vec<String> = repository
        .list_roles()
        .await
        .unwrap_or_default()
        .iter()
        .map(|role| role.name().as_str().to_owned())
        .collect();

    assert_eq!(names, vec!["admin", "editor", "viewer"]);
}

#[tokio::test]
async fn lookup_respects_collection() {
    let repository = InMemoryAccessRepository::new();
    let admin = role(&repository, "admin").await;

    let found = repository
        .find_id_by_column(AccessCollection::Roles, LookupColumn::Name, "admin")
        .await;
    let missing = repository
        .find_id_by_column(AccessCollection::Permissions, LookupColumn::Name, "admin")
        .await;

    assert_eq!(found.ok().flatten(), Some(admin));
    assert_eq!(missing.ok().flatten(), None);
}

#[tokio::test]
async fn attach_rejects_unknown_targets_without_partial_writes() {
    let repository = InMemoryAccessRepository::new();
    let admin = role(&repository, "admin").await;
    let known = permission(&repository, "index_users").await;

    let result = repository
        .attach(Association::RolePermissions, admin, &[known, 404])
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    let held = repository
        .count_held(Relation::RolePermission, admin, &BTreeSet::from([known]))
        .await;
    assert_eq!(held.ok(), Some(0));
}

#[tokio::test]
async fn sync_reports_attached_and_detached() {
    let repository = InMemoryAccessRepository::new();
    let editor = role(&repository, "editor").await;
    let index = permission(&repository, "index_articles").await;
    let edit = permission(&repository, "edit_articles").await;
    let create = permission(&repository, "create_articles").await;
    assert!(
        repository
            .attach(Association::RolePermissions, editor, &[index, edit])
            .await
            .is_ok()
    );

    let changes = repository
        .sync(Association::RolePermissions, editor, &[edit, create], true)
        .await
        .unwrap_or_default();

    assert_eq!(changes.attached, vec![create]);
    assert_eq!(changes.detached, vec![index]);
}

#[tokio::test]
async fn detach_without_targets_clears_owner_only() {
    let repository = InMemoryAccessRepository::new();
    let admin = role(&repository, "admin").await;
    let editor = role(&repository, "editor").await;
    let shared = permission(&repository, "shared").await;
    for owner in [admin, editor] {
        assert!(
            repository
                .attach(Association::RolePermissions, owner, &[shared])
                .await
                .is_ok()
        );
    }

    let removed = repository
        .detach(Association::RolePermissions, admin, None)
        .await;

    assert_eq!(removed.ok(), Some(vec![shared]));
    let permissions = repository
        .list_role_permissions(RoleId::new(editor))
        .await
        .unwrap_or_default();
    assert_eq!(permissions.len(), 1);
}

#[tokio::test]
async fn principal_permissions_flow_through_roles() {
    let repository = InMemoryAccessRepository::new();
    let principal = repository.register_principal("user").await;
    assert!(principal.is_ok());
    let principal_id = principal
        .map(|principal| principal.id())
        .unwrap_or_else(|_| unreachable!());
    let admin = role(&repository, "admin").await;
    let editor = role(&repository, "editor").await;
    let shared = permission(&repository, "shared").await;
    let users = permission(&repository, "users").await;
    assert!(
        repository
            .attach(Association::RolePermissions, admin, &[shared, users])
            .await
            .is_ok()
    );
    assert!(
        repository
            .attach(Association::RolePermissions, editor, &[shared])
            .await
            .is_ok()
    );
    assert!(
        repository
            .attach(Association::PrincipalRoles, principal_id.as_i64(), &[editor])
            .await
            .is_ok()
    );

    let held = repository
        .count_held(
            Relation::PrincipalPermission,
            principal_id.as_i64(),
            &BTreeSet::from([shared, users]),
        )
        .await;
    assert_eq!(held.ok(), Some(1));

    assert!(
        repository
            .delete_permission(PermissionId::new(shared))
            .await
            .is_ok()
    );
    let effective = repository
        .list_principal_permissions(principal_id)
        .await
        .unwrap_or_default();
    assert!(effective.is_empty());
}

#[tokio::test]
async fn deleting_role_cascades_to_principals_and_permissions() {
    let repository = Arc::new(InMemoryAccessRepository::new());
    let principal_id = repository
        .register_principal("root")
        .await
        .map(|principal| principal.id())
        .unwrap_or_else(|_| unreachable!());
    let admin = role(&repository, "admin").await;
    let edit_users = permission(&repository, "edit_users").await;
    assert!(
        repository
            .attach(Association::PrincipalRoles, principal_id.as_i64(), &[admin])
            .await
            .is_ok()
    );
    assert!(
        repository
            .attach(Association::RolePermissions, admin, &[edit_users])
            .await
            .is_ok()
    );

    let service = AccessService::new(repository.clone(), repository.clone());
    let subject = AccessSubject::Principal(principal_id);
    let admin_role = AccessReferences::<Role>::from("admin");
    let edit_permission = AccessReferences::<Permission>::from("edit_users");
    assert!(
        service
            .has_roles(subject, &admin_role, MatchMode::All, LookupColumn::Name)
            .await
    );

    assert!(repository.delete_role(RoleId::new(admin)).await.is_ok());

    let roles = repository
        .list_principal_roles(principal_id)
        .await
        .unwrap_or_default();
    assert!(roles.is_empty());
    let granted = repository
        .list_role_permissions(RoleId::new(admin))
        .await
        .unwrap_or_default();
    assert!(granted.is_empty());
    let held = repository
        .count_held(Relation::RolePermission, admin, &BTreeSet::from([edit_users]))
        .await;
    assert_eq!(held.ok(), Some(0));

    assert!(
        !service
            .has_roles(subject, &admin_role, MatchMode::All, LookupColumn::Name)
            .await
    );
    assert!(
        !service
            .has_permissions(subject, &edit_permission, MatchMode::Any, LookupColumn::Name)
            .await
    );
}
