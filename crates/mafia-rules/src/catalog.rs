//! The role catalog: every role's static definition.
//!
//! Roles form a closed set ([`RoleKind`]). Behaviour that varies per role
//! is data in a [`RoleDef`] row (tiers, counters, flags) plus three small
//! tags the resolvers dispatch on: [`DayAbility`], [`NightAbility`] and
//! [`WinRule`].
//!
//! The catalog is built once and shared by every game through an
//! `Arc<RoleCatalog>`. A custom catalog may retune the rows (tiers, use
//! counts, limits, names) but must still define every [`RoleKind`]
//! exactly once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Tier};

// ---------------------------------------------------------------------------
// RoleKind / Alignment
// ---------------------------------------------------------------------------

/// Every role the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleKind {
    Citizen,
    Doctor,
    Sheriff,
    Jailor,
    Pi,
    Lookout,
    Mafia,
    Janitor,
    Disguiser,
    Survivor,
    Jester,
    Executioner,
    Arsonist,
}

impl RoleKind {
    /// Every kind, in catalog order.
    pub const ALL: [RoleKind; 13] = [
        Self::Citizen,
        Self::Doctor,
        Self::Sheriff,
        Self::Jailor,
        Self::Pi,
        Self::Lookout,
        Self::Mafia,
        Self::Janitor,
        Self::Disguiser,
        Self::Survivor,
        Self::Jester,
        Self::Executioner,
        Self::Arsonist,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which side a role plays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Citizen,
    Mafia,
    Independent,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Citizen => write!(f, "Citizens"),
            Self::Mafia => write!(f, "Mafia"),
            Self::Independent => write!(f, "Independents"),
        }
    }
}

// ---------------------------------------------------------------------------
// Ability and win tags
// ---------------------------------------------------------------------------

/// What a role may do during the day, besides nominating and voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayAbility {
    None,
    /// Jail a player for the coming night.
    Jail,
}

/// What a role may do at night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NightAbility {
    None,
    Protect,
    /// Attack a target; backfires onto the shooter if the target appears
    /// to be a citizen.
    Shoot,
    /// Compare the apparent alignments of two players.
    Investigate,
    /// Learn who visits a player.
    Watch,
    Clean,
    Disguise,
    /// Douse a player, or pick yourself to ignite everyone doused.
    Douse,
    /// Self-protection, limited by `uses`.
    Vest,
    /// Execute tonight's prisoner. Only offered while someone is jailed.
    Execute,
}

/// The win predicate a role is judged by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinRule {
    /// No mafia left alive.
    Citizens,
    /// Mafia control the vote (see [`crate::win::win_condition`]).
    Mafia,
    /// Still alive at the end.
    Survive,
    /// Lynched, or killed by a non-mafia player.
    Jester,
    /// Own target lynched. Falls back to [`WinRule::Jester`] without one.
    Executioner,
    /// The only player left alive.
    LastStanding,
}

// ---------------------------------------------------------------------------
// RoleDef
// ---------------------------------------------------------------------------

/// Static definition of one role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDef {
    pub kind: RoleKind,
    /// Numeric id used by the setup token.
    pub id: u8,
    pub name: String,
    /// One-line description sent with the role assignment.
    pub summary: String,
    pub alignment: Alignment,
    pub attack: Tier,
    /// Innate defense.
    pub defense: Tier,
    /// Defense granted to whoever this role protects.
    pub grants: Tier,
    /// Starting value of the limited-use counter, if the role has one.
    pub uses: Option<u8>,
    /// Maximum copies per game.
    pub limit: Option<usize>,
    /// Configurable special role (everything except plain citizen/mafia).
    pub special: bool,
    /// Wins alongside whichever side ends the game.
    pub simultaneous_win: bool,
    /// Alive holders of this role keep the mafia from winning by day.
    pub can_kill_mafia_at_night: bool,
    pub day: DayAbility,
    pub night: NightAbility,
    pub win: WinRule,
}

impl RoleDef {
    fn new(kind: RoleKind, id: u8, name: &str, alignment: Alignment, summary: &str) -> Self {
        let win = match alignment {
            Alignment::Citizen => WinRule::Citizens,
            Alignment::Mafia => WinRule::Mafia,
            Alignment::Independent => WinRule::Survive,
        };
        Self {
            kind,
            id,
            name: name.to_owned(),
            summary: summary.to_owned(),
            alignment,
            attack: Tier::None,
            defense: Tier::None,
            grants: Tier::None,
            uses: None,
            limit: None,
            special: true,
            simultaneous_win: false,
            can_kill_mafia_at_night: false,
            day: DayAbility::None,
            night: NightAbility::None,
            win,
        }
    }

    /// Returns `true` for the mafia roles other than plain Mafia.
    pub fn is_special_mafia(&self) -> bool {
        self.special && self.alignment == Alignment::Mafia
    }
}

// ---------------------------------------------------------------------------
// RoleCatalog
// ---------------------------------------------------------------------------

/// Lookup table of role definitions, one row per [`RoleKind`].
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    /// Indexed by `RoleKind::index()`.
    defs: Vec<RoleDef>,
}

impl RoleCatalog {
    /// The standard role set.
    pub fn standard() -> Self {
        use Alignment::{Citizen, Independent, Mafia};

        let mut defs = Vec::with_capacity(RoleKind::ALL.len());

        let mut citizen = RoleDef::new(
            RoleKind::Citizen,
            0,
            "Citizen",
            Citizen,
            "Find the mafia and lynch them by day.",
        );
        citizen.special = false;
        defs.push(citizen);

        let mut doctor = RoleDef::new(
            RoleKind::Doctor,
            1,
            "Doctor",
            Citizen,
            "Each night, choose one player to save from death.",
        );
        doctor.grants = Tier::Powerful;
        doctor.night = NightAbility::Protect;
        defs.push(doctor);

        let mut sheriff = RoleDef::new(
            RoleKind::Sheriff,
            2,
            "Sheriff",
            Citizen,
            "Each night you may shoot a player. Shoot a citizen and you die instead.",
        );
        sheriff.attack = Tier::Basic;
        sheriff.can_kill_mafia_at_night = true;
        sheriff.night = NightAbility::Shoot;
        defs.push(sheriff);

        let mut jailor = RoleDef::new(
            RoleKind::Jailor,
            3,
            "Jailor",
            Citizen,
            "By day, jail a player for the night. At night you may execute them.",
        );
        jailor.attack = Tier::Unstoppable;
        jailor.grants = Tier::Powerful;
        jailor.uses = Some(3);
        jailor.can_kill_mafia_at_night = true;
        jailor.day = DayAbility::Jail;
        jailor.night = NightAbility::Execute;
        defs.push(jailor);

        let mut pi = RoleDef::new(
            RoleKind::Pi,
            4,
            "PI",
            Citizen,
            "Each night, learn whether two players share an alignment.",
        );
        pi.night = NightAbility::Investigate;
        defs.push(pi);

        let mut lookout = RoleDef::new(
            RoleKind::Lookout,
            5,
            "Lookout",
            Citizen,
            "Each night, watch a player and learn who visits them.",
        );
        lookout.night = NightAbility::Watch;
        defs.push(lookout);

        let mut mafia = RoleDef::new(
            RoleKind::Mafia,
            75,
            "Mafia",
            Mafia,
            "Kill the town. The godfather picks the victim each night.",
        );
        mafia.attack = Tier::Basic;
        mafia.special = false;
        defs.push(mafia);

        let mut janitor = RoleDef::new(
            RoleKind::Janitor,
            76,
            "Janitor",
            Mafia,
            "Each night, clean a body so only you learn its role.",
        );
        janitor.attack = Tier::Basic;
        janitor.uses = Some(3);
        janitor.limit = Some(1);
        janitor.night = NightAbility::Clean;
        defs.push(janitor);

        let mut disguiser = RoleDef::new(
            RoleKind::Disguiser,
            77,
            "Disguiser",
            Mafia,
            "Each night, make a mafia member look like a non-mafia player.",
        );
        disguiser.attack = Tier::Basic;
        disguiser.night = NightAbility::Disguise;
        defs.push(disguiser);

        let mut survivor = RoleDef::new(
            RoleKind::Survivor,
            150,
            "Survivor",
            Independent,
            "Stay alive until the end. You have a few bulletproof vests.",
        );
        survivor.grants = Tier::Basic;
        survivor.uses = Some(4);
        survivor.simultaneous_win = true;
        survivor.night = NightAbility::Vest;
        defs.push(survivor);

        let mut jester = RoleDef::new(
            RoleKind::Jester,
            151,
            "Jester",
            Independent,
            "Get yourself lynched, or killed by anyone but the mafia.",
        );
        jester.limit = Some(1);
        jester.simultaneous_win = true;
        jester.win = WinRule::Jester;
        defs.push(jester);

        let mut executioner = RoleDef::new(
            RoleKind::Executioner,
            152,
            "Executioner",
            Independent,
            "Get your target lynched.",
        );
        executioner.limit = Some(1);
        executioner.simultaneous_win = true;
        executioner.win = WinRule::Executioner;
        defs.push(executioner);

        let mut arsonist = RoleDef::new(
            RoleKind::Arsonist,
            153,
            "Arsonist",
            Independent,
            "Douse players each night, then ignite them all. Be the last one standing.",
        );
        arsonist.attack = Tier::Unstoppable;
        arsonist.defense = Tier::Basic;
        arsonist.night = NightAbility::Douse;
        arsonist.win = WinRule::LastStanding;
        defs.push(arsonist);

        Self { defs }
    }

    /// Builds a catalog from custom rows.
    ///
    /// # Errors
    /// Returns [`ConfigError::Catalog`] unless every [`RoleKind`] appears
    /// exactly once and every id is unique.
    pub fn from_defs(defs: Vec<RoleDef>) -> Result<Self, ConfigError> {
        let mut slots: Vec<Option<RoleDef>> = vec![None; RoleKind::ALL.len()];
        for def in defs {
            if slots.iter().flatten().any(|d| d.id == def.id) {
                return Err(ConfigError::Catalog(format!("duplicate role id {}", def.id)));
            }
            let slot = &mut slots[def.kind.index()];
            if slot.is_some() {
                return Err(ConfigError::Catalog(format!("{} defined twice", def.kind)));
            }
            *slot = Some(def);
        }

        let mut ordered = Vec::with_capacity(slots.len());
        for (kind, slot) in RoleKind::ALL.iter().zip(slots) {
            match slot {
                Some(def) => ordered.push(def),
                None => return Err(ConfigError::Catalog(format!("{kind} is not defined"))),
            }
        }
        Ok(Self { defs: ordered })
    }

    /// Returns the definition of `kind`.
    pub fn get(&self, kind: RoleKind) -> &RoleDef {
        &self.defs[kind.index()]
    }

    /// Looks a role up by its token id.
    pub fn by_id(&self, id: u8) -> Option<&RoleDef> {
        self.defs.iter().find(|d| d.id == id)
    }

    /// Iterates over every definition in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &RoleDef> {
        self.defs.iter()
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rows_are_indexed_by_kind() {
        let catalog = RoleCatalog::standard();
        for kind in RoleKind::ALL {
            assert_eq!(catalog.get(kind).kind, kind);
        }
    }

    #[test]
    fn test_standard_ids() {
        let catalog = RoleCatalog::standard();
        assert_eq!(catalog.get(RoleKind::Citizen).id, 0);
        assert_eq!(catalog.get(RoleKind::Mafia).id, 75);
        assert_eq!(catalog.get(RoleKind::Arsonist).id, 153);
        assert_eq!(catalog.by_id(76).map(|d| d.kind), Some(RoleKind::Janitor));
        assert!(catalog.by_id(200).is_none());
    }

    #[test]
    fn test_plain_roles_are_not_special() {
        let catalog = RoleCatalog::standard();
        assert!(!catalog.get(RoleKind::Citizen).special);
        assert!(!catalog.get(RoleKind::Mafia).special);
        assert!(catalog.get(RoleKind::Janitor).is_special_mafia());
        assert!(!catalog.get(RoleKind::Mafia).is_special_mafia());
        assert!(!catalog.get(RoleKind::Doctor).is_special_mafia());
    }

    #[test]
    fn test_night_killers() {
        let catalog = RoleCatalog::standard();
        let killers: Vec<RoleKind> = catalog
            .iter()
            .filter(|d| d.can_kill_mafia_at_night)
            .map(|d| d.kind)
            .collect();
        assert_eq!(killers, vec![RoleKind::Sheriff, RoleKind::Jailor]);
    }

    #[test]
    fn test_from_defs_reorders_and_validates() {
        let mut defs: Vec<RoleDef> = RoleCatalog::standard().iter().cloned().collect();
        defs.reverse();
        defs[0].name = "Pyro".into();
        let catalog = RoleCatalog::from_defs(defs).unwrap();
        assert_eq!(catalog.get(RoleKind::Arsonist).name, "Pyro");
        assert_eq!(catalog.get(RoleKind::Citizen).kind, RoleKind::Citizen);
    }

    #[test]
    fn test_from_defs_rejects_missing_kind() {
        let defs: Vec<RoleDef> = RoleCatalog::standard()
            .iter()
            .filter(|d| d.kind != RoleKind::Lookout)
            .cloned()
            .collect();
        assert!(matches!(
            RoleCatalog::from_defs(defs),
            Err(ConfigError::Catalog(_))
        ));
    }

    #[test]
    fn test_from_defs_rejects_duplicate_id() {
        let mut defs: Vec<RoleDef> = RoleCatalog::standard().iter().cloned().collect();
        defs[1].id = 0;
        assert!(RoleCatalog::from_defs(defs).is_err());
    }
}
