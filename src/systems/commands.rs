use std::collections::HashMap;

use bevy_ecs::prelude::*;
use tracing::debug;

use crate::components::identity::{ChatId, UserId, UserRef};
use crate::rules::odds::Dice;
use crate::rules::outcome::LifeError;
use crate::simulation::bounty::ChatEconomyStore;
use crate::simulation::host::HostServices;
use crate::simulation::registry::LifeRegistry;
use crate::simulation::settings::LifeSettings;
use crate::simulation::time::GameClock;
use crate::simulation::timers::OccupationTimers;
use crate::systems::protocol::{self, LifeContext};
use crate::ui::text;

/// How long a kill proposal waits for `/confirm`.
pub const KILL_CONFIRMATION_WINDOW_MS: u64 = 2 * 60_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifeCommand {
    Info,
    Status,
    Work { minutes: Option<String> },
    CommunityService { minutes: Option<String> },
    Hustle,
    Breakout,
    Bribe { amount: Option<String> },
    Kill { target: Option<String> },
    Confirm,
    Cancel,
    PlaceBounty { args: Vec<String> },
    Bounties,
    Office,
    Prison,
    Hospital,
    ToggleTags,
}

impl LifeCommand {
    /// Parses `/name[@bot] args...`. Returns None for text that isn't a life command.
    pub fn parse(input: &str) -> Option<Self> {
        let mut parts = input.split_whitespace();
        let head = parts.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head).to_lowercase();
        let args: Vec<String> = parts.map(str::to_string).collect();
        let first = args.first().cloned();

        let command = match name.as_str() {
            "life" => LifeCommand::Info,
            "status" => LifeCommand::Status,
            "work" => LifeCommand::Work { minutes: first },
            "communityservice" => LifeCommand::CommunityService { minutes: first },
            "hustle" | "crime" | "rob" => LifeCommand::Hustle,
            "breakout" => LifeCommand::Breakout,
            "bribe" => LifeCommand::Bribe { amount: first },
            "kill" => LifeCommand::Kill { target: first },
            "confirm" => LifeCommand::Confirm,
            "cancel" => LifeCommand::Cancel,
            "placebounty" => LifeCommand::PlaceBounty { args },
            "bounties" => LifeCommand::Bounties,
            "office" => LifeCommand::Office,
            "prison" => LifeCommand::Prison,
            "hospital" => LifeCommand::Hospital,
            "togglelifetags" => LifeCommand::ToggleTags,
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub chat_id: ChatId,
    pub sender: UserRef,
    /// Author of the message the sender replied to, if any.
    pub reply_to: Option<UserRef>,
    pub command: LifeCommand,
}

#[derive(Resource, Debug, Default)]
pub struct CommandQueue(pub Vec<(u64, CommandRequest)>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub request_id: u64,
    pub chat_id: ChatId,
    pub text: String,
}

#[derive(Resource, Debug, Default)]
pub struct ReplyLog(pub Vec<Reply>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingKill {
    pub handle: String,
    /// Price the actor was shown.
    pub cost: i64,
    pub proposed_at_ms: u64,
}

/// Kill proposals awaiting confirmation: the target handle and the quoted price.
#[derive(Resource, Debug, Default)]
pub struct KillConfirmations {
    pending: HashMap<(ChatId, UserId), PendingKill>,
}

impl KillConfirmations {
    pub fn propose(&mut self, chat_id: ChatId, actor: UserId, handle: &str, cost: i64, now_ms: u64) {
        self.pending.insert(
            (chat_id, actor),
            PendingKill {
                handle: handle.to_string(),
                cost,
                proposed_at_ms: now_ms,
            },
        );
    }

    pub fn take(&mut self, chat_id: ChatId, actor: UserId, now_ms: u64) -> Option<PendingKill> {
        let pending = self.pending.remove(&(chat_id, actor))?;
        (now_ms.saturating_sub(pending.proposed_at_ms) <= KILL_CONFIRMATION_WINDOW_MS)
            .then_some(pending)
    }

    pub fn expire(&mut self, now_ms: u64) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, pending| {
            now_ms.saturating_sub(pending.proposed_at_ms) <= KILL_CONFIRMATION_WINDOW_MS
        });
        before - self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// System: answers every queued command.
#[allow(clippy::too_many_arguments)]
pub fn command_system(
    clock: Res<GameClock>,
    settings: Res<LifeSettings>,
    mut queue: ResMut<CommandQueue>,
    mut replies: ResMut<ReplyLog>,
    mut registry: ResMut<LifeRegistry>,
    mut timers: ResMut<OccupationTimers>,
    mut store: ResMut<ChatEconomyStore>,
    mut host: ResMut<HostServices>,
    mut dice: ResMut<Dice>,
    mut confirmations: ResMut<KillConfirmations>,
) {
    for (request_id, request) in queue.0.drain(..) {
        let mut ctx = LifeContext {
            now_ms: clock.now_ms,
            chat_id: request.chat_id,
            settings: &*settings,
            registry: &mut *registry,
            timers: &mut *timers,
            store: &mut *store,
            host: &mut *host,
            dice: &mut *dice,
        };
        let text = handle_command(&mut ctx, &mut confirmations, &request);
        replies.0.push(Reply {
            request_id,
            chat_id: request.chat_id,
            text,
        });
    }
}

/// System: forgets kill proposals nobody confirmed in time.
pub fn expire_kill_confirmations_system(
    clock: Res<GameClock>,
    mut confirmations: ResMut<KillConfirmations>,
) {
    let expired = confirmations.expire(clock.now_ms);
    if expired > 0 {
        debug!(expired, "kill proposals expired");
    }
}

pub fn handle_command(
    ctx: &mut LifeContext,
    confirmations: &mut KillConfirmations,
    request: &CommandRequest,
) -> String {
    let actor = &request.sender;
    let outcome = match &request.command {
        LifeCommand::Info => Ok(text::plugin_info()),
        LifeCommand::Status => Ok(protocol::status(ctx, actor)),
        LifeCommand::Office => Ok(protocol::office(ctx)),
        LifeCommand::Prison => Ok(protocol::prison(ctx)),
        LifeCommand::Hospital => Ok(protocol::hospital(ctx)),
        LifeCommand::Bounties => Ok(protocol::list_bounties(ctx)),
        LifeCommand::ToggleTags => Ok(protocol::toggle_tags(ctx, actor)),
        LifeCommand::Work { minutes } => protocol::work(ctx, actor, minutes.as_deref()),
        LifeCommand::CommunityService { minutes } => {
            protocol::community_service(ctx, actor, minutes.as_deref())
        }
        LifeCommand::Hustle => protocol::hustle(ctx, actor),
        LifeCommand::Breakout => protocol::breakout(ctx, actor, request.reply_to.as_ref()),
        LifeCommand::Bribe { amount } => protocol::bribe(ctx, actor, amount.as_deref()),
        LifeCommand::PlaceBounty { args } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            protocol::place_bounty(ctx, actor, &args)
        }
        LifeCommand::Kill { target } => {
            protocol::prepare_kill(ctx, actor, target.as_deref()).map(|plan| {
                confirmations.propose(ctx.chat_id, actor.id, &plan.target.name, plan.cost, ctx.now_ms);
                text::prefixed(
                    &actor.mention(),
                    &text::kill_proposal(plan.cost, &plan.target.name),
                )
            })
        }
        LifeCommand::Confirm => match confirmations.take(ctx.chat_id, actor.id, ctx.now_ms) {
            Some(pending) => {
                let outcome = protocol::confirm_kill(ctx, actor, &pending.handle, pending.cost);
                if let Err(LifeError::KillPriceChanged { cost, .. }) = &outcome {
                    confirmations.propose(ctx.chat_id, actor.id, &pending.handle, *cost, ctx.now_ms);
                }
                outcome
            }
            None => Err(LifeError::NothingToConfirm),
        },
        LifeCommand::Cancel => match confirmations.take(ctx.chat_id, actor.id, ctx.now_ms) {
            Some(_) => Ok(text::prefixed(&actor.mention(), &text::kill_cancelled())),
            None => Err(LifeError::NothingToConfirm),
        },
    };
    outcome.unwrap_or_else(|err| err.prefixed(&actor.mention()))
}
