//! The economic actions: work, community service, hustle, breakout, bribe, bounties and the two-phase kill.

use tracing::info;

use crate::components::identity::{ChatId, UserRef};
use crate::rules::odds::{self, Dice};
use crate::rules::outcome::LifeError;
use crate::simulation::bounty::ChatEconomyStore;
use crate::simulation::host::HostServices;
use crate::simulation::occupation::OccupationKind;
use crate::simulation::registry::LifeRegistry;
use crate::simulation::settings::LifeSettings;
use crate::simulation::timers::{Completion, OccupationTimers};
use crate::ui::text;

/// Everything an action may read or mutate while it runs.
pub struct LifeContext<'a> {
    pub now_ms: u64,
    pub chat_id: ChatId,
    pub settings: &'a LifeSettings,
    pub registry: &'a mut LifeRegistry,
    pub timers: &'a mut OccupationTimers,
    pub store: &'a mut ChatEconomyStore,
    pub host: &'a mut HostServices,
    pub dice: &'a mut Dice,
}

/// A validated kill, priced against the scores at preparation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillPlan {
    pub target: UserRef,
    pub cost: i64,
}

impl<'a> LifeContext<'a> {
    fn score(&self, user: &UserRef) -> i64 {
        self.host.ledger.score(self.chat_id, user.id)
    }

    fn alter_score(&mut self, user: &UserRef, delta: i64) -> i64 {
        self.host.ledger.alter_score(self.chat_id, user.id, delta)
    }

    fn ensure_free(&mut self, actor: &UserRef) -> Result<(), LifeError> {
        let now_ms = self.now_ms;
        let life_user = self.registry.find_or_create(self.chat_id, actor);
        if life_user.is_free() {
            Ok(())
        } else {
            Err(LifeError::Busy(life_user.status(now_ms)))
        }
    }

    fn resolve_handle(&self, handle: &str) -> Result<UserRef, LifeError> {
        self.host
            .directory
            .find_by_handle(self.chat_id, handle)
            .ok_or(LifeError::UserDoesNotExist)
    }

    fn incarcerate(&mut self, user: &UserRef, unlawful_kill: bool) -> i64 {
        let minutes = self.dice.prison_minutes(unlawful_kill);
        let (chat_id, now_ms) = (self.chat_id, self.now_ms);
        let timers = &mut *self.timers;
        self.registry
            .find_or_create(self.chat_id, user)
            .incarcerate(timers, chat_id, minutes, now_ms)
            .remaining_minutes(now_ms)
    }
}

pub fn status(ctx: &mut LifeContext, actor: &UserRef) -> String {
    let now_ms = ctx.now_ms;
    ctx.registry.find_or_create(ctx.chat_id, actor).status(now_ms)
}

fn parse_minutes(argument: Option<&str>) -> Result<Option<u32>, LifeError> {
    let Some(raw) = argument else {
        return Ok(None);
    };
    let minutes: u32 = raw.trim().parse().map_err(|_| LifeError::InvalidNumber)?;
    if minutes == 0 {
        return Err(LifeError::InvalidNumber);
    }
    if minutes > odds::MAX_SHIFT_MINUTES {
        return Err(LifeError::ShiftTooLong(odds::MAX_SHIFT_MINUTES));
    }
    Ok(Some(minutes))
}

fn parse_amount(raw: &str) -> Result<i64, LifeError> {
    match raw.trim().parse::<i64>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(LifeError::InvalidNumber),
    }
}

pub fn work(
    ctx: &mut LifeContext,
    actor: &UserRef,
    minutes: Option<&str>,
) -> Result<String, LifeError> {
    ctx.ensure_free(actor)?;
    let minutes = match parse_minutes(minutes)? {
        Some(minutes) => minutes,
        None => ctx.dice.work_minutes(),
    };
    let reward = odds::work_reward(minutes, ctx.settings.work_multiplier);
    let (chat_id, now_ms) = (ctx.chat_id, ctx.now_ms);
    let timers = &mut *ctx.timers;
    let occupation = ctx.registry.find_or_create(ctx.chat_id, actor).start_work(
        timers,
        chat_id,
        minutes,
        now_ms,
        Completion::Paycheck { reward },
    );
    Ok(text::prefixed(&actor.mention(), &occupation.start_message(now_ms)))
}

pub fn community_service(
    ctx: &mut LifeContext,
    actor: &UserRef,
    minutes: Option<&str>,
) -> Result<String, LifeError> {
    ctx.ensure_free(actor)?;
    let minutes = match parse_minutes(minutes)? {
        Some(minutes) => minutes,
        None => ctx.dice.work_minutes(),
    };
    let reduction = odds::work_reward(minutes, ctx.settings.work_multiplier);
    let (chat_id, now_ms) = (ctx.chat_id, ctx.now_ms);
    let timers = &mut *ctx.timers;
    let occupation = ctx.registry.find_or_create(ctx.chat_id, actor).start_community_service(
        timers,
        chat_id,
        minutes,
        now_ms,
        Completion::CommunityService { reduction },
    );
    Ok(text::prefixed(&actor.mention(), &occupation.start_message(now_ms)))
}

pub fn hustle(ctx: &mut LifeContext, actor: &UserRef) -> Result<String, LifeError> {
    ctx.ensure_free(actor)?;

    if ctx.dice.chance(odds::HUSTLE_SUCCESS) {
        let steps = ctx
            .dice
            .between(odds::HUSTLE_REWARD_STEPS.0, odds::HUSTLE_REWARD_STEPS.1);
        let reward = odds::hustle_reward(steps, ctx.settings.hustle_multiplier);
        let gains = ctx.alter_score(actor, reward);
        if gains > 0 {
            ctx.store.add_police_bounty(
                ctx.chat_id,
                actor.id,
                gains as f64 * odds::HUSTLE_POLICE_SHARE,
            );
        }
        info!(chat = %ctx.chat_id, user = %actor.id, gains, "hustle paid off");
        Ok(text::prefixed(&actor.mention(), &text::hustle_successful(gains)))
    } else {
        let minutes = ctx.incarcerate(actor, false);
        info!(chat = %ctx.chat_id, user = %actor.id, minutes, "hustler arrested");
        Ok(text::prefixed(&actor.mention(), &text::thrown_in_jail(minutes)))
    }
}

/// `inmate` is the author of the message the actor replied to.
pub fn breakout(
    ctx: &mut LifeContext,
    actor: &UserRef,
    inmate: Option<&UserRef>,
) -> Result<String, LifeError> {
    ctx.ensure_free(actor)?;
    let inmate = inmate.ok_or(LifeError::BreakoutInstructions)?;
    if inmate.id == actor.id {
        return Err(LifeError::BreakoutYourself);
    }
    if !ctx.registry.find_or_create(ctx.chat_id, inmate).is(OccupationKind::Incarcerated) {
        return Err(LifeError::NotInPrison(inmate.name.clone()));
    }

    if ctx.dice.chance(odds::BREAKOUT_SUCCESS) {
        let timers = &mut *ctx.timers;
        ctx.registry.find_or_create(ctx.chat_id, inmate).clear_occupation(timers);

        let steps = ctx
            .dice
            .between(odds::BREAKOUT_REWARD_STEPS.0, odds::BREAKOUT_REWARD_STEPS.1);
        let reward = ctx.alter_score(actor, steps as i64 * odds::BREAKOUT_REWARD_PER_STEP);
        let police_bounty = reward.max(odds::BREAKOUT_REWARD_PER_STEP) as f64;
        ctx.store.add_police_bounty(ctx.chat_id, actor.id, police_bounty);
        ctx.store.add_police_bounty(
            ctx.chat_id,
            inmate.id,
            police_bounty * odds::BREAKOUT_INMATE_BOUNTY_SHARE,
        );
        info!(chat = %ctx.chat_id, liberator = %actor.id, inmate = %inmate.id, reward, "breakout succeeded");
        Ok(text::prefixed(
            &actor.mention(),
            &text::did_break_out_inmate(&inmate.name, reward),
        ))
    } else {
        let minutes = ctx.incarcerate(actor, false);
        info!(chat = %ctx.chat_id, liberator = %actor.id, inmate = %inmate.id, minutes, "breakout failed");
        Ok(text::prefixed(&actor.mention(), &text::breakout_failed(minutes)))
    }
}

pub fn bribe(
    ctx: &mut LifeContext,
    actor: &UserRef,
    amount: Option<&str>,
) -> Result<String, LifeError> {
    if !ctx.registry.find_or_create(ctx.chat_id, actor).is(OccupationKind::Incarcerated) {
        return Err(LifeError::YouAreNotInPrison);
    }
    let amount = parse_amount(amount.ok_or(LifeError::BribeInstructions)?)?;
    let total_funds = ctx.score(actor);
    if amount > total_funds {
        return Err(LifeError::CantSpendMoreThanYouHave(amount));
    }

    let chance = odds::bribe_success_chance(amount, total_funds);
    let paid = -ctx.alter_score(actor, -amount);
    if ctx.dice.chance(chance) {
        let timers = &mut *ctx.timers;
        ctx.registry.find_or_create(ctx.chat_id, actor).clear_occupation(timers);
        ctx.store.add_police_bounty(ctx.chat_id, actor.id, paid as f64);
        info!(chat = %ctx.chat_id, user = %actor.id, paid, chance, "bribe accepted");
        Ok(text::prefixed(&actor.mention(), text::BRIBE_SUCCESSFUL))
    } else {
        info!(chat = %ctx.chat_id, user = %actor.id, paid, chance, "bribe refused");
        Ok(text::prefixed(&actor.mention(), &text::bribing_failed(paid)))
    }
}

pub fn place_bounty(
    ctx: &mut LifeContext,
    actor: &UserRef,
    args: &[&str],
) -> Result<String, LifeError> {
    ctx.ensure_free(actor)?;
    let [handle, amount, ..] = args else {
        return Err(LifeError::PlaceBountyTooFewArguments);
    };
    let amount = parse_amount(amount)?;
    let target = ctx.resolve_handle(handle)?;
    if target.id == actor.id {
        return Err(LifeError::BountyOnYourself);
    }
    if amount > ctx.score(actor) {
        return Err(LifeError::CantSpendMoreThanYouHave(amount));
    }

    let paid = -ctx.alter_score(actor, -amount);
    ctx.store.place_bounty(ctx.chat_id, actor.id, target.id, paid);
    info!(chat = %ctx.chat_id, placer = %actor.id, target = %target.id, paid, "bounty placed");
    Ok(text::placed_bounty(&actor.name, paid, &target.name))
}

/// Validates a kill and prices it from the scores as they are right now.
pub fn prepare_kill(
    ctx: &mut LifeContext,
    actor: &UserRef,
    handle: Option<&str>,
) -> Result<KillPlan, LifeError> {
    ctx.ensure_free(actor)?;
    let handle = handle
        .map(str::trim)
        .filter(|handle| !handle.is_empty())
        .ok_or(LifeError::KillTooFewArguments)?;
    let target = ctx.resolve_handle(handle)?;
    if target.id == actor.id {
        return Err(LifeError::KillYourself);
    }

    let now_ms = ctx.now_ms;
    let target_user = ctx.registry.find_or_create(ctx.chat_id, &target);
    if let Some(occupation) = target_user.occupation() {
        if !occupation.interruptible_for_hospitalization() {
            return Err(LifeError::TargetUnavailable(
                occupation.status_message(Some(&target.name), now_ms),
            ));
        }
    }

    let cost = odds::kill_cost(
        ctx.score(actor),
        ctx.score(&target),
        ctx.settings.kill_cost_fraction(),
    );
    if cost > ctx.score(actor) {
        return Err(LifeError::CantSpendMoreThanYouHave(cost));
    }
    Ok(KillPlan { target, cost })
}

/// Second phase. Preparation runs again so nothing stale from the proposal is trusted;
/// a price other than `quoted_cost` is refused.
pub fn confirm_kill(
    ctx: &mut LifeContext,
    actor: &UserRef,
    handle: &str,
    quoted_cost: i64,
) -> Result<String, LifeError> {
    let KillPlan { target, cost } = prepare_kill(ctx, actor, Some(handle))?;
    if cost != quoted_cost {
        return Err(LifeError::KillPriceChanged {
            target: target.name,
            cost,
        });
    }
    let paid = -ctx.alter_score(actor, -cost);
    let chat_id = ctx.chat_id;
    let lawful = ctx
        .store
        .bounty_for(chat_id, target.id)
        .map(|bounty| bounty.is_police_bounty)
        .unwrap_or(false);
    let police_bounty = paid as f64 * ctx.settings.kill_bounty_multiplier;

    if ctx.dice.chance(odds::KILL_SUCCESS) {
        let (now_ms, minutes) = (ctx.now_ms, ctx.settings.hospital_duration_minutes);
        let timers = &mut *ctx.timers;
        let hospital_minutes = ctx
            .registry
            .find_or_create(ctx.chat_id, &target)
            .hospitalize(timers, chat_id, minutes, now_ms)
            .remaining_minutes(now_ms);

        let claimed = match ctx.store.claim_bounty(chat_id, target.id) {
            Some(bounty) if bounty.amount > 0 => ctx.alter_score(actor, bounty.amount),
            _ => 0,
        };
        if !lawful {
            ctx.store.add_police_bounty(chat_id, actor.id, police_bounty);
        }
        info!(chat = %chat_id, killer = %actor.id, target = %target.id, paid, claimed, lawful, "kill succeeded");
        Ok(text::prefixed(
            &actor.mention(),
            &text::kill_successful(&target.name, hospital_minutes, claimed),
        ))
    } else if lawful {
        info!(chat = %chat_id, killer = %actor.id, target = %target.id, paid, "bounty hunt failed");
        Ok(text::prefixed(&actor.mention(), &text::kill_failed_escaped(&target.name)))
    } else {
        ctx.store.add_police_bounty(
            chat_id,
            actor.id,
            police_bounty * odds::KILL_ATTEMPT_BOUNTY_SHARE,
        );
        let minutes = ctx.incarcerate(actor, true);
        info!(chat = %chat_id, killer = %actor.id, target = %target.id, paid, minutes, "kill attempt failed");
        Ok(text::prefixed(
            &actor.mention(),
            &text::kill_failed_arrested(&target.name, minutes),
        ))
    }
}

pub fn toggle_tags(ctx: &mut LifeContext, actor: &UserRef) -> String {
    let tagged = ctx.store.toggle_tagging(ctx.chat_id, actor.id);
    text::prefixed(&actor.mention(), &text::tagging_toggled(tagged))
}

pub fn list_bounties(ctx: &mut LifeContext) -> String {
    let chat_id = ctx.chat_id;
    let lines: Vec<String> = ctx
        .store
        .list_bounties(chat_id)
        .iter()
        .map(|bounty| {
            let target = ctx.host.user_or_placeholder(chat_id, bounty.user_id);
            text::bounty_line(&target.name, bounty.amount, bounty.is_police_bounty)
        })
        .collect();
    if lines.is_empty() {
        return text::NO_BOUNTIES.to_string();
    }
    text::roster(text::BOUNTIES_HEADER, &lines)
}

pub fn office(ctx: &mut LifeContext) -> String {
    let entries = ctx.registry.roster(ctx.chat_id, ctx.now_ms, OccupationKind::is_office);
    roster_or_empty(text::OFFICE_HEADER, text::OFFICE_EMPTY, &entries)
}

pub fn prison(ctx: &mut LifeContext) -> String {
    let entries = ctx.registry.roster(ctx.chat_id, ctx.now_ms, |kind| {
        kind == OccupationKind::Incarcerated
    });
    roster_or_empty(text::PRISON_HEADER, text::PRISON_EMPTY, &entries)
}

pub fn hospital(ctx: &mut LifeContext) -> String {
    let entries = ctx.registry.roster(ctx.chat_id, ctx.now_ms, |kind| {
        kind == OccupationKind::Hospitalized
    });
    roster_or_empty(text::HOSPITAL_HEADER, text::HOSPITAL_EMPTY, &entries)
}

fn roster_or_empty(header: &str, empty: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        empty.to_string()
    } else {
        text::roster(header, entries)
    }
}
