use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use warden_core::{AppError, AppResult, PrincipalId};
use warden_domain::{
    AccessCheckSpec, AccessCollection, AccessGuard, AccessReferences, AccessSubject,
    LookupColumn, MatchMode, Permission, PermissionId, Principal, Role, RoleId,
};

use crate::test_fakes::FakeAccessStore;
use crate::{
    AccessAssociationRepository, AccessCatalogRepository, AccessItemInput, Association,
    AssociationChanges, Relation, RoleAssignment,
};

use super::AccessService;

struct Fixture {
    service: AccessService,
    root: PrincipalId,
    user: PrincipalId,
    editor_role: RoleId,
}

async fn fixture() -> Fixture {
    let store = Arc::new(FakeAccessStore::default());

    let admin = store.seed_role("admin", None).await;
    let editor = store.seed_role("editor", None).await;
    for name in ["index_users", "edit_users", "create_users", "delete_users"] {
        let permission = store.seed_permission(name).await;
        store
            .link(Association::RolePermissions, admin, permission)
            .await;
    }
    for name in [
        "index_articles",
        "edit_articles",
        "create_articles",
        "delete_articles",
    ] {
        let permission = store.seed_permission(name).await;
        store
            .link(Association::RolePermissions, editor, permission)
            .await;
    }

    let root = store.seed_principal("root").await;
    let user = store.seed_principal("user").await;
    store
        .link(Association::PrincipalRoles, root.as_i64(), admin)
        .await;
    store
        .link(Association::PrincipalRoles, root.as_i64(), editor)
        .await;
    store
        .link(Association::PrincipalRoles, user.as_i64(), editor)
        .await;

    Fixture {
        service: AccessService::new(store.clone(), store),
        root,
        user,
        editor_role: RoleId::new(editor),
    }
}

async fn roles(fixture: &Fixture, principal: PrincipalId, spec: &str, mode: MatchMode) -> bool {
    fixture
        .service
        .has_roles(
            AccessSubject::Principal(principal),
            &AccessReferences::from(spec),
            mode,
            LookupColumn::Name,
        )
        .await
}

async fn permissions(
    subject: AccessSubject,
    fixture: &Fixture,
    spec: &str,
    mode: MatchMode,
) -> bool {
    fixture
        .service
        .has_permissions(
            subject,
            &AccessReferences::from(spec),
            mode,
            LookupColumn::Name,
        )
        .await
}

#[tokio::test]
async fn role_checks_follow_all_and_any_semantics() {
    let fixture = fixture().await;

    assert!(roles(&fixture, fixture.root, "admin", MatchMode::All).await);
    assert!(!roles(&fixture, fixture.user, "admin", MatchMode::All).await);
    assert!(roles(&fixture, fixture.user, "editor", MatchMode::All).await);
    assert!(roles(&fixture, fixture.root, "admin|editor", MatchMode::All).await);
    assert!(!roles(&fixture, fixture.user, "admin|editor", MatchMode::All).await);
    assert!(roles(&fixture, fixture.user, "admin|editor", MatchMode::Any).await);
}

#[tokio::test]
async fn permission_checks_walk_principal_roles() {
    let fixture = fixture().await;
    let user = AccessSubject::Principal(fixture.user);
    let root = AccessSubject::Principal(fixture.root);

    assert!(permissions(user, &fixture, "index_articles", MatchMode::All).await);
    assert!(!permissions(user, &fixture, "index_users", MatchMode::All).await);
    assert!(permissions(user, &fixture, "index_articles|index_users", MatchMode::Any).await);
    assert!(!permissions(user, &fixture, "index_articles|index_users", MatchMode::All).await);
    assert!(permissions(root, &fixture, "index_users edit_articles", MatchMode::All).await);
}

#[tokio::test]
async fn role_subject_checks_its_own_permissions() {
    let fixture = fixture().await;
    let editor = AccessSubject::Role(fixture.editor_role);

    assert!(permissions(editor, &fixture, "index_articles", MatchMode::All).await);
    assert!(!permissions(editor, &fixture, "index_users", MatchMode::All).await);
    assert!(!permissions(editor, &fixture, "index_articles|index_users", MatchMode::All).await);
    assert!(permissions(editor, &fixture, "index_articles|index_users", MatchMode::Any).await);
}

#[tokio::test]
async fn role_subject_cannot_hold_roles() {
    let fixture = fixture().await;

    let granted = fixture
        .service
        .has_roles(
            AccessSubject::Role(fixture.editor_role),
            &AccessReferences::from("editor"),
            MatchMode::Any,
            LookupColumn::Name,
        )
        .await;

    assert!(!granted);
}

#[tokio::test]
async fn guest_never_matches() {
    let fixture = fixture().await;

    for mode in [MatchMode::All, MatchMode::Any] {
        assert!(
            !fixture
                .service
                .has_roles(
                    AccessSubject::Guest,
                    &AccessReferences::from("admin|editor"),
                    mode,
                    LookupColumn::Name,
                )
                .await
        );
        assert!(!permissions(AccessSubject::Guest, &fixture, "index_articles", mode).await);
    }
}

#[tokio::test]
async fn unknown_names_count_as_not_held() {
    let fixture = fixture().await;

    assert!(!roles(&fixture, fixture.root, "admin|ghost", MatchMode::All).await);
    assert!(roles(&fixture, fixture.root, "admin|ghost", MatchMode::Any).await);
    assert!(!roles(&fixture, fixture.root, "ghost", MatchMode::Any).await);
}

#[tokio::test]
async fn check_spec_and_guard_use_their_mode() {
    let fixture = fixture().await;
    let user = AccessSubject::Principal(fixture.user);

    let spec = AccessCheckSpec::<Role>::from_json(&json!(["admin|editor", false]));
    assert!(spec.is_ok());
    let spec = spec.unwrap_or_else(|_| unreachable!());
    assert!(fixture.service.has_roles_spec(user, &spec).await);

    let guard = |definition: &str| {
        AccessGuard::parse(definition).unwrap_or_else(|_| unreachable!())
    };
    let strict = guard("role,admin|editor");
    let relaxed = guard("role,admin|editor,false");
    let permission = guard("permission,edit_articles");

    assert!(!fixture.service.passes_guard(user, &strict).await);
    assert!(fixture.service.passes_guard(user, &relaxed).await);
    assert!(fixture.service.passes_guard(user, &permission).await);
}

struct FailingStore;

#[async_trait]
impl AccessCatalogRepository for FailingStore {
    async fn create_role(&self, _input: AccessItemInput) -> AppResult<Role> {
        Err(unavailable())
    }

    async fn find_role(&self, _role_id: RoleId) -> AppResult<Option<Role>> {
        Err(unavailable())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Err(unavailable())
    }

    async fn delete_role(&self, _role_id: RoleId) -> AppResult<()> {
        Err(unavailable())
    }

    async fn create_permission(&self, _input: AccessItemInput) -> AppResult<Permission> {
        Err(unavailable())
    }

    async fn find_permission(&self, _permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Err(unavailable())
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Err(unavailable())
    }

    async fn delete_permission(&self, _permission_id: PermissionId) -> AppResult<()> {
        Err(unavailable())
    }

    async fn find_id_by_column(
        &self,
        _collection: AccessCollection,
        _column: LookupColumn,
        _value: &str,
    ) -> AppResult<Option<i64>> {
        Err(unavailable())
    }

    async fn register_principal(&self, _name: &str) -> AppResult<Principal> {
        Err(unavailable())
    }

    async fn find_principal(&self, _principal_id: PrincipalId) -> AppResult<Option<Principal>> {
        Err(unavailable())
    }

    async fn find_principal_by_name(&self, _name: &str) -> AppResult<Option<Principal>> {
        Err(unavailable())
    }

    async fn delete_principal(&self, _principal_id: PrincipalId) -> AppResult<()> {
        Err(unavailable())
    }
}

#[async_trait]
impl AccessAssociationRepository for FailingStore {
    async fn attach(
        &self,
        _association: Association,
        _owner_id: i64,
        _target_ids: &[i64],
    ) -> AppResult<Vec<i64>> {
        Err(unavailable())
    }

    async fn detach(
        &self,
        _association: Association,
        _owner_id: i64,
        _target_ids: Option<&[i64]>,
    ) -> AppResult<Vec<i64>> {
        Err(unavailable())
    }

    async fn sync(
        &self,
        _association: Association,
        _owner_id: i64,
        _target_ids: &[i64],
        _detaching: bool,
    ) -> AppResult<AssociationChanges> {
        Err(unavailable())
    }

    async fn count_held(
        &self,
        _relation: Relation,
        _owner_id: i64,
        _target_ids: &BTreeSet<i64>,
    ) -> AppResult<usize> {
        Err(unavailable())
    }

    async fn list_principal_roles(
        &self,
        _principal_id: PrincipalId,
    ) -> AppResult<Vec<RoleAssignment>> {
        Err(unavailable())
    }

    async fn list_role_permissions(&self, _role_id: RoleId) -> AppResult<Vec<Permission>> {
        Err(unavailable())
    }

    async fn list_principal_permissions(
        &self,
        _principal_id: PrincipalId,
    ) -> AppResult<Vec<Permission>> {
        Err(unavailable())
    }
}

fn unavailable() -> AppError {
    AppError::Internal("store unavailable".to_owned())
}

#[tokio::test]
async fn store_errors_degrade_to_denial() {
    let store = Arc::new(FailingStore);
    let service = AccessService::new(store.clone(), store);
    let subject = AccessSubject::Principal(PrincipalId::new(1));

    assert!(
        !service
            .has_roles(
                subject,
                &AccessReferences::from("admin"),
                MatchMode::Any,
                LookupColumn::Name,
            )
            .await
    );
    assert!(
        !service
            .has_permissions(
                subject,
                &AccessReferences::from(7),
                MatchMode::Any,
                LookupColumn::Name,
            )
            .await
    );
}
