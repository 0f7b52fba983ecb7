use tracing::info;
use warden_application::{AccessAdminService, AccessItemInput};
use warden_core::{AppError, AppResult, PrincipalId};
use warden_domain::{AccessName, AccessReferences, LookupColumn, Permission, Role};

const DEV_SEED_ADMIN_ROLE: (&str, &str) = ("admin", "Administrator");
const DEV_SEED_EDITOR_ROLE: (&str, &str) = ("editor", "Editor");
const DEV_SEED_ADMIN_PERMISSIONS: [&str; 5] = [
    "index_users",
    "edit_users",
    "create_users",
    "delete_users",
    "access.manage",
];
const DEV_SEED_EDITOR_PERMISSIONS: [&str; 4] = [
    "index_articles",
    "edit_articles",
    "create_articles",
    "delete_articles",
];
const DEV_SEED_ROOT_PRINCIPAL: &str = "root";
const DEV_SEED_STANDARD_PRINCIPAL: &str = "user";

/// Seeds the demo catalog: `root` holds admin and editor, `user` holds editor.
///
/// Running it again leaves existing rows in place.
pub async fn run(admin: &AccessAdminService) -> AppResult<()> {
    let admin_role = ensure_role(admin, DEV_SEED_ADMIN_ROLE).await?;
    let editor_role = ensure_role(admin, DEV_SEED_EDITOR_ROLE).await?;

    for name in DEV_SEED_ADMIN_PERMISSIONS
        .iter()
        .chain(DEV_SEED_EDITOR_PERMISSIONS.iter())
    {
        ensure_permission(admin, name).await?;
    }

    admin
        .attach_permissions(
            admin_role.id(),
            &AccessReferences::<Permission>::from(DEV_SEED_ADMIN_PERMISSIONS),
            LookupColumn::Name,
        )
        .await?;
    admin
        .attach_permissions(
            editor_role.id(),
            &AccessReferences::<Permission>::from(DEV_SEED_EDITOR_PERMISSIONS),
            LookupColumn::Name,
        )
        .await?;

    let root = ensure_principal(admin, DEV_SEED_ROOT_PRINCIPAL).await?;
    let standard = ensure_principal(admin, DEV_SEED_STANDARD_PRINCIPAL).await?;

    admin
        .attach_roles(
            root,
            &AccessReferences::<Role>::ids([admin_role.id().as_i64(), editor_role.id().as_i64()]),
            LookupColumn::Name,
        )
        .await?;
    admin
        .attach_roles(
            standard,
            &AccessReferences::<Role>::from(editor_role),
            LookupColumn::Name,
        )
        .await?;

    info!(
        root_principal_id = root.as_i64(),
        standard_principal_id = standard.as_i64(),
        "development seed applied"
    );
    Ok(())
}

async fn ensure_role(
    admin: &AccessAdminService,
    (name, fullname): (&str, &str),
) -> AppResult<Role> {
    let input = AccessItemInput {
        name: AccessName::new(name)?,
        fullname: Some(fullname.to_owned()),
        description: None,
    };

    match admin.create_role(input).await {
        Ok(role) => Ok(role),
        Err(AppError::Conflict(_)) => admin.find_role_by_name(name).await,
        Err(error) => Err(error),
    }
}

async fn ensure_permission(admin: &AccessAdminService, name: &str) -> AppResult<Permission> {
    let input = AccessItemInput {
        name: AccessName::new(name)?,
        fullname: None,
        description: None,
    };

    match admin.create_permission(input).await {
        Ok(permission) => Ok(permission),
        Err(AppError::Conflict(_)) => admin.find_permission_by_name(name).await,
        Err(error) => Err(error),
    }
}

async fn ensure_principal(admin: &AccessAdminService, name: &str) -> AppResult<PrincipalId> {
    if let Some(principal) = admin.find_principal_by_name(name).await? {
        return Ok(principal.id());
    }

    Ok(admin.register_principal(name).await?.id())
}
