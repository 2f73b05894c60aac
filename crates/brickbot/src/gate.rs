use crate::{utils, Context, Error};
use poise::serenity_prelude as serenity;

/// Global command check: every command requires the configured role.
/// The role id takes precedence when set; the role name is the fallback
/// and doubles as the display name in denials. DMs never pass.
/// The denial embed is sent from here, so the error handler stays quiet
/// on check failures.
pub async fn check_member_role(ctx: Context<'_>) -> Result<bool, Error> {
    let access = &ctx.data().config.access;

    let Some(guild_id) = ctx.guild_id() else {
        deny(ctx, &access.allowed_role_name).await;
        return Ok(false);
    };
    let Some(member) = ctx.author_member().await else {
        deny(ctx, &access.allowed_role_name).await;
        return Ok(false);
    };

    let roles = ctx.http().get_guild_roles(guild_id).await?;

    let (required, display) = match access.allowed_role_id {
        Some(id) => {
            let rid = serenity::RoleId::new(id);
            let display = roles
                .iter()
                .find(|r| r.id == rid)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| format!("role id {}", id));
            (Some(rid), display)
        }
        None => {
            let found = roles.iter().find(|r| r.name == access.allowed_role_name);
            (found.map(|r| r.id), access.allowed_role_name.clone())
        }
    };

    let allowed = match required {
        Some(rid) => member.roles.contains(&rid),
        None => false,
    };
    if !allowed {
        deny(ctx, &display).await;
    }
    Ok(allowed)
}

async fn deny(ctx: Context<'_>, role: &str) {
    utils::send_err_embed(
        ctx,
        "Access denied",
        &format!("You need the `{}` role to use this bot.", role),
    )
    .await;
}
