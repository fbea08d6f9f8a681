//! The bot's command set.
//!
//! Moderation commands (strike, promotion) upsert rows in the store;
//! deployment commands post announcements; warrant formats a multi-section
//! announcement from pipe-delimited fields. All replies go to the channel
//! the command was issued in.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use garrison_channel::IncomingMessage;

use super::handler::{Command, HandlerContext};
use super::registry::CommandRegistry;

/// Register all built-in commands into the given registry.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register(Box::new(StrikeCommand));
    registry.register(Box::new(PromotionCommand));
    registry.register(Box::new(DeploymentStartCommand));
    registry.register(Box::new(DeploymentEndCommand));
    registry.register(Box::new(DeploymentStartPollCommand));
    registry.register(Box::new(WarrantCommand));
    registry.register(Box::new(HealthCommand));
    registry.register(Box::new(HelpCommand));
}

/// Extract a user ID from a mention token.
///
/// Accepts platform mention syntax (`<@123>`, `<@!123>`), an `@`-prefixed
/// name, or a bare numeric ID.
fn parse_user_mention(token: &str) -> Option<String> {
    if let Some(inner) = token.strip_prefix("<@").and_then(|t| t.strip_suffix('>')) {
        let id = inner.strip_prefix('!').unwrap_or(inner);
        if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
            return Some(id.to_string());
        }
        return None;
    }
    if let Some(name) = token.strip_prefix('@') {
        if !name.is_empty() {
            return Some(name.to_string());
        }
        return None;
    }
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return Some(token.to_string());
    }
    None
}

fn role_mention(role_id: &str) -> String {
    format!("<@&{role_id}>")
}

// ---------------------------------------------------------------------------
// StrikeCommand
// ---------------------------------------------------------------------------

/// Increments a user's strike counter.
struct StrikeCommand;

#[async_trait]
impl Command for StrikeCommand {
    fn name(&self) -> &str {
        "strike"
    }

    fn description(&self) -> &str {
        "Record a strike against a user"
    }

    fn usage(&self) -> &str {
        "strike <@user>"
    }

    async fn execute(
        &self,
        msg: &IncomingMessage,
        args: &[String],
        ctx: &HandlerContext,
    ) -> Result<()> {
        let token = args.first().ok_or_else(|| anyhow!("expected a user mention"))?;
        let user = parse_user_mention(token)
            .ok_or_else(|| anyhow!("malformed user mention: {token}"))?;

        let count = ctx
            .strikes
            .increment(ctx.store.as_ref(), &ctx.spreadsheet_id, &user)
            .await?;

        ctx.reply(
            msg,
            &format!("Strike recorded for <@{user}>. Total Strikes: {count}"),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// PromotionCommand
// ---------------------------------------------------------------------------

/// Records a user's new rank, reporting the previous one.
struct PromotionCommand;

#[async_trait]
impl Command for PromotionCommand {
    fn name(&self) -> &str {
        "promotion"
    }

    fn description(&self) -> &str {
        "Record a user's promotion to a new rank"
    }

    fn usage(&self) -> &str {
        "promotion <@user> <newRank>"
    }

    async fn execute(
        &self,
        msg: &IncomingMessage,
        args: &[String],
        ctx: &HandlerContext,
    ) -> Result<()> {
        let token = args.first().ok_or_else(|| anyhow!("expected a user mention"))?;
        let user = parse_user_mention(token)
            .ok_or_else(|| anyhow!("malformed user mention: {token}"))?;
        let rank = args[1..].join(" ");
        if rank.is_empty() {
            bail!("expected a new rank after the user mention");
        }

        let previous = ctx
            .ranks
            .promote(ctx.store.as_ref(), &ctx.spreadsheet_id, &user, &rank)
            .await?;

        let reply = match previous {
            Some(old) => format!(
                "Promotion recorded for <@{user}>. Previous Rank: {old} | New Rank: {rank}"
            ),
            None => format!("Promotion recorded for <@{user}>. New Rank: {rank}"),
        };
        ctx.reply(msg, &reply).await
    }
}

// ---------------------------------------------------------------------------
// Deployment announcements
// ---------------------------------------------------------------------------

fn deployment_args(args: &[String]) -> Result<(&str, String)> {
    let time = args
        .first()
        .map(String::as_str)
        .ok_or_else(|| anyhow!("expected <time> <team>"))?;
    let team = args[1..].join(" ");
    if team.is_empty() {
        bail!("expected a team after the time");
    }
    Ok((time, team))
}

/// Announces the start of a deployment.
struct DeploymentStartCommand;

#[async_trait]
impl Command for DeploymentStartCommand {
    fn name(&self) -> &str {
        "deploymentstart"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["deploy-start", "deploystart"]
    }

    fn description(&self) -> &str {
        "Announce the start of a deployment"
    }

    fn usage(&self) -> &str {
        "deploymentstart <time> <team>"
    }

    async fn execute(
        &self,
        msg: &IncomingMessage,
        args: &[String],
        ctx: &HandlerContext,
    ) -> Result<()> {
        let (time, team) = deployment_args(args)?;
        ctx.reply(
            msg,
            &format!(
                "{} **DEPLOYMENT START**\nTime: {time}\nTeam: {team}",
                role_mention(&ctx.default_role_id)
            ),
        )
        .await
    }
}

/// Announces the end of a deployment.
struct DeploymentEndCommand;

#[async_trait]
impl Command for DeploymentEndCommand {
    fn name(&self) -> &str {
        "deploymentend"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["deploy-end", "deployend"]
    }

    fn description(&self) -> &str {
        "Announce the end of a deployment"
    }

    fn usage(&self) -> &str {
        "deploymentend <time> <team>"
    }

    async fn execute(
        &self,
        msg: &IncomingMessage,
        args: &[String],
        ctx: &HandlerContext,
    ) -> Result<()> {
        let (time, team) = deployment_args(args)?;
        ctx.reply(
            msg,
            &format!(
                "{} **DEPLOYMENT END**\nTime: {time}\nTeam: {team}",
                role_mention(&ctx.default_role_id)
            ),
        )
        .await
    }
}

/// Posts a deployment readiness poll.
struct DeploymentStartPollCommand;

#[async_trait]
impl Command for DeploymentStartPollCommand {
    fn name(&self) -> &str {
        "deploymentstartpoll"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["deployment-start-poll", "dsppoll"]
    }

    fn description(&self) -> &str {
        "Post a deployment readiness poll"
    }

    fn usage(&self) -> &str {
        "deploymentstartpoll"
    }

    async fn execute(
        &self,
        msg: &IncomingMessage,
        _args: &[String],
        ctx: &HandlerContext,
    ) -> Result<()> {
        ctx.reply(
            msg,
            &format!(
                "{} **DEPLOYMENT READINESS POLL**\nReact \u{1F44D} if ready to deploy, \u{1F44E} if not.",
                role_mention(&ctx.default_role_id)
            ),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// WarrantCommand
// ---------------------------------------------------------------------------

/// Named defaults for omitted warrant fields.
const DEFAULT_SUBJECT: &str = "Unknown Subject";
const DEFAULT_REASON: &str = "Unspecified";
const DEFAULT_THREAT: &str = "Unknown";
const DEFAULT_BULLETS: &str = "None listed";

/// Render a `;`-separated list as bullet lines, or the default when empty.
fn bullet_lines(raw: &str) -> String {
    let items: Vec<&str> = raw
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return format!("- {DEFAULT_BULLETS}");
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the warrant announcement from pipe-delimited fields.
///
/// Field order: role mention (`-` selects the default), subject, reason,
/// threat level, charges (`;`-separated), notes (`;`-separated). Any omitted
/// field receives its named default.
fn format_warrant(raw: &str, default_role_id: &str) -> String {
    let mut fields = raw.split('|').map(str::trim);

    let role = match fields.next() {
        Some("") | Some("-") | None => role_mention(default_role_id),
        Some(explicit) => explicit.to_string(),
    };
    let subject = match fields.next() {
        Some("") | None => DEFAULT_SUBJECT,
        Some(s) => s,
    };
    let reason = match fields.next() {
        Some("") | None => DEFAULT_REASON,
        Some(r) => r,
    };
    let threat = match fields.next() {
        Some("") | None => DEFAULT_THREAT,
        Some(t) => t,
    };
    let charges = bullet_lines(fields.next().unwrap_or(""));
    let notes = bullet_lines(fields.next().unwrap_or(""));

    format!(
        "{role}\n**WARRANT ISSUED**\nSubject: {subject}\nReason: {reason}\nThreat Level: {threat}\n\nCharges:\n{charges}\n\nNotes:\n{notes}"
    )
}

/// Formats and posts a multi-section warrant announcement.
struct WarrantCommand;

#[async_trait]
impl Command for WarrantCommand {
    fn name(&self) -> &str {
        "warrant"
    }

    fn description(&self) -> &str {
        "Post a warrant announcement"
    }

    fn usage(&self) -> &str {
        "warrant <@role|-> | <subject> | <reason> | <threatLevel> | <charge;charge> | <note;note>"
    }

    async fn execute(
        &self,
        msg: &IncomingMessage,
        args: &[String],
        ctx: &HandlerContext,
    ) -> Result<()> {
        // The router split on whitespace; the pipe-delimited field list is
        // reassembled from the raw tokens.
        let raw = args.join(" ");
        ctx.reply(msg, &format_warrant(&raw, &ctx.default_role_id))
            .await
    }
}

// ---------------------------------------------------------------------------
// HealthCommand
// ---------------------------------------------------------------------------

/// Liveness probe over chat.
struct HealthCommand;

#[async_trait]
impl Command for HealthCommand {
    fn name(&self) -> &str {
        "health"
    }

    fn description(&self) -> &str {
        "Check that the bot is alive"
    }

    fn usage(&self) -> &str {
        "health"
    }

    async fn execute(
        &self,
        msg: &IncomingMessage,
        _args: &[String],
        ctx: &HandlerContext,
    ) -> Result<()> {
        ctx.reply(msg, "ok").await
    }
}

// ---------------------------------------------------------------------------
// HelpCommand
// ---------------------------------------------------------------------------

/// Lists the registered commands.
struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["commands"]
    }

    fn description(&self) -> &str {
        "List available commands"
    }

    fn usage(&self) -> &str {
        "help"
    }

    async fn execute(
        &self,
        msg: &IncomingMessage,
        _args: &[String],
        ctx: &HandlerContext,
    ) -> Result<()> {
        let mut lines = vec!["Available commands:".to_string()];
        for cmd in ctx.registry.list() {
            let aliases = cmd.aliases();
            let alias_str = if aliases.is_empty() {
                String::new()
            } else {
                format!(" (aliases: {})", aliases.join(", "))
            };
            lines.push(format!("{}{}: {}", cmd.usage(), alias_str, cmd.description()));
        }
        ctx.reply(msg, &lines.join("\n")).await
    }
}
