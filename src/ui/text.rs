//! User-facing message text for the life game.

use crate::simulation::occupation::OccupationKind;

pub const YOU_ARE_FREE: &str = "You are free to do as you like";
pub const OFFICE_EMPTY: &str = "It's an empty day at the office..";
pub const OFFICE_HEADER: &str = "🏢 <b> Players working at the office </b> 🏢";
pub const PRISON_EMPTY: &str = "The State Penitentiary is completely empty..";
pub const PRISON_HEADER: &str = "🔒 <b> Prison inmates </b> 🔒";
pub const HOSPITAL_EMPTY: &str = "No patients at the hospital today..";
pub const HOSPITAL_HEADER: &str = "🏥 <b> Hospital patients </b> 🏥";
pub const BOUNTIES_HEADER: &str = "📃 <b> Bounties </b> 📃";
pub const NO_BOUNTIES: &str = "There are no outstanding bounties.";
pub const RELEASED_FROM_PRISON: &str = "You're released from prison!";
pub const RELEASED_FROM_HOSPITAL: &str = "You're released from the hospital!";
pub const BRIBE_SUCCESSFUL: &str =
    "👮🏻‍♂️ Your bribing attempt was successful. You are released from prison!";

pub fn minutes(value: i64) -> String {
    if value < 1 {
        "less than a minute".to_string()
    } else if value == 1 {
        "1 minute".to_string()
    } else {
        format!("{} minutes", value)
    }
}

pub fn points(value: i64) -> String {
    if value.abs() == 1 {
        format!("{} point", value)
    } else {
        format!("{} points", value)
    }
}

pub fn prefixed(mention: &str, message: &str) -> String {
    format!("{}: {}", mention, message)
}

pub fn currently(kind: OccupationKind, name: Option<&str>) -> String {
    let activity = match kind {
        OccupationKind::Working => "working",
        OccupationKind::Incarcerated => "in prison",
        OccupationKind::Hospitalized => "recovering in the hospital",
        OccupationKind::CommunityService => "doing community service",
    };
    match name {
        Some(name) => format!("{} is currently {}", name, activity),
        None => format!("You are currently {}", activity),
    }
}

pub fn occupation_emoji(kind: OccupationKind) -> &'static str {
    match kind {
        OccupationKind::Working => "🏢",
        OccupationKind::Incarcerated => "🔒",
        OccupationKind::Hospitalized => "🏥",
        OccupationKind::CommunityService => "🧹",
    }
}

pub fn started_working(minutes_left: i64) -> String {
    format!("You started working. You'll get paid in {}", minutes(minutes_left))
}

pub fn started_community_service(minutes_left: i64) -> String {
    format!(
        "You picked up a litter stick. Community service ends in {}",
        minutes(minutes_left)
    )
}

pub fn thrown_in_jail(minutes_left: i64) -> String {
    format!(
        "<b>The police got a hold of you.</b> You're going to prison for {} 👮🏻‍♂️",
        minutes(minutes_left)
    )
}

pub fn hospitalized(minutes_left: i64) -> String {
    format!("You were taken to the hospital for {} 🚑", minutes(minutes_left))
}

pub fn done_working(reward: i64) -> String {
    format!("You're done working and earned {}!", points(reward))
}

pub fn done_community_service(reduction: i64) -> String {
    if reduction > 0 {
        format!(
            "You finished your community service. Your bounty dropped by {}!",
            points(reduction)
        )
    } else {
        "You finished your community service. Society thanks you!".to_string()
    }
}

pub fn hustle_successful(gains: i64) -> String {
    format!("You hustled and made {} 💰", points(gains))
}

pub fn did_break_out_inmate(inmate: &str, reward: i64) -> String {
    format!("Broke out {}. Here's a reward of {}!", inmate, points(reward))
}

pub fn breakout_failed(prison_minutes: i64) -> String {
    format!(
        "<b> The breakout failed. </b> You're going to prison for {} 👮🏻",
        minutes(prison_minutes)
    )
}

pub fn bribing_failed(points_lost: i64) -> String {
    format!(
        "👮🏻‍♂️ Your bribing attempt has failed! You've lost {}! 😭",
        points(points_lost)
    )
}

pub fn kill_proposal(cost: i64, target: &str) -> String {
    format!(
        "Killing {} will cost you {}. Send /confirm to go ahead or /cancel to back off 🔪",
        target,
        points(cost)
    )
}

pub fn kill_successful(target: &str, hospital_minutes: i64, claimed: i64) -> String {
    let mut message = format!(
        "💀 You took out {}. They'll be in the hospital for {}.",
        target,
        minutes(hospital_minutes)
    );
    if claimed > 0 {
        message.push_str(&format!(" You claimed a bounty of {}!", points(claimed)));
    }
    message
}

pub fn kill_failed_escaped(target: &str) -> String {
    format!("{} got away! Your points are spent though.", target)
}

pub fn kill_failed_arrested(target: &str, prison_minutes: i64) -> String {
    format!(
        "<b>Your attempt on {} failed.</b> The police caught you and you're going to prison for {} 👮🏻‍♂️",
        target,
        minutes(prison_minutes)
    )
}

pub fn kill_cancelled() -> String {
    "Maybe another day 🕊".to_string()
}

pub fn placed_bounty(placer: &str, bounty: i64, target: &str) -> String {
    format!(
        "📃 @{} put a bounty worth {} on @{} !",
        placer,
        points(bounty),
        target
    )
}

pub fn bounty_line(name: &str, amount: i64, is_police_bounty: bool) -> String {
    let mut line = format!("{}: {}", name, points(amount));
    if is_police_bounty {
        line.push_str(" [ 🚓 ]");
    }
    line
}

pub fn roster(header: &str, entries: &[String]) -> String {
    format!("{} \n-\t{}", header, entries.join("\n-\t"))
}

pub fn tagging_toggled(tagged: bool) -> String {
    if tagged {
        "You will be tagged when you are done working or completed your sentence 🔔".to_string()
    } else {
        "You will no longer be tagged when you are done working or completed your sentence 🔕"
            .to_string()
    }
}

pub fn plugin_info() -> String {
    [
        "🍋 Life - Choose your destiny 🍋 \n",
        "/status - To see how life is looking for you",
        "/work - To earn money the safe (and boring) way",
        "/communityservice - Work off your bounty by doing good",
        "/hustle | /crime | /rob - To earn money the gangster way - you may end up in prison!",
        "/office - See who's in the office",
        "/hospital - See who's in the hospital",
        "/prison - See who's locked up in prison",
        "/breakout - Reply this to a prison inmate to attempt to break them out",
        "/bribe - Attempt to buy your way to freedom - provide an amount of money you're willing to spend!",
        "/bounties - See all outstanding bounties",
        "/placebounty - Place a bounty on a player",
        "/kill - Attempt to kill a player to claim their bounty",
        "/togglelifetags - Toggles if you are tagged whenever you are done working or completed your sentence",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_are_pluralised() {
        assert_eq!(minutes(0), "less than a minute");
        assert_eq!(minutes(1), "1 minute");
        assert_eq!(minutes(37), "37 minutes");
    }

    #[test]
    fn points_handle_negative_singular() {
        assert_eq!(points(-1), "-1 point");
        assert_eq!(points(250), "250 points");
    }

    #[test]
    fn police_bounties_are_marked() {
        assert_eq!(bounty_line("bob", 300, true), "bob: 300 points [ 🚓 ]");
        assert_eq!(bounty_line("bob", 1, false), "bob: 1 point");
    }
}
