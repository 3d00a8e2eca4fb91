//! Actions a combatant can take

use skirmish_protocol::SkillDescriptor;

use super::side::SideId;

/// Lowest priority tier
pub const MIN_PRIORITY: i8 = -2;

/// Highest priority tier
pub const MAX_PRIORITY: i8 = 2;

/// Action kinds without payloads, used for modifier applicability and queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionTag {
    Attack,
    QuickAttack,
    Defend,
    Meditate,
    Skill,
    Swap,
    EmergencyHeal,
}

impl ActionTag {
    pub const ALL: [ActionTag; 7] = [
        ActionTag::Attack,
        ActionTag::QuickAttack,
        ActionTag::Defend,
        ActionTag::Meditate,
        ActionTag::Skill,
        ActionTag::Swap,
        ActionTag::EmergencyHeal,
    ];

    /// Configured base tier for this kind
    pub fn base_priority(&self) -> i8 {
        match self {
            ActionTag::Attack => 0,
            ActionTag::QuickAttack => 1,
            ActionTag::Defend => 1,
            ActionTag::Meditate => -1,
            ActionTag::Skill => 0,
            ActionTag::Swap => 0,
            ActionTag::EmergencyHeal => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionTag::Attack => "attack",
            ActionTag::QuickAttack => "quick_attack",
            ActionTag::Defend => "defend",
            ActionTag::Meditate => "meditate",
            ActionTag::Skill => "skill",
            ActionTag::Swap => "swap",
            ActionTag::EmergencyHeal => "emergency_heal",
        }
    }
}

impl std::fmt::Display for ActionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What an action does
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    Attack { quick: bool },
    Defend,
    Meditate,
    Skill(SkillDescriptor),
    /// Bring the reserve at this roster index into play
    Swap { to: usize },
    /// Heal by a fixed amount, or a configured fraction of max health
    EmergencyHeal { amount: Option<u32> },
}

impl ActionKind {
    pub fn attack() -> Self {
        ActionKind::Attack { quick: false }
    }

    pub fn quick_attack() -> Self {
        ActionKind::Attack { quick: true }
    }

    pub fn tag(&self) -> ActionTag {
        match self {
            ActionKind::Attack { quick: false } => ActionTag::Attack,
            ActionKind::Attack { quick: true } => ActionTag::QuickAttack,
            ActionKind::Defend => ActionTag::Defend,
            ActionKind::Meditate => ActionTag::Meditate,
            ActionKind::Skill(_) => ActionTag::Skill,
            ActionKind::Swap { .. } => ActionTag::Swap,
            ActionKind::EmergencyHeal { .. } => ActionTag::EmergencyHeal,
        }
    }

    /// Modifier contributed by the action instance itself
    pub fn instance_modifier(&self) -> i8 {
        match self {
            ActionKind::Skill(skill) => skill.priority,
            ActionKind::Attack { .. }
            | ActionKind::Defend
            | ActionKind::Meditate
            | ActionKind::Swap { .. }
            | ActionKind::EmergencyHeal { .. } => 0,
        }
    }

    /// Resource the action costs up front
    pub fn cost(&self) -> u32 {
        match self {
            ActionKind::Skill(skill) => skill.cost,
            ActionKind::Attack { .. }
            | ActionKind::Defend
            | ActionKind::Meditate
            | ActionKind::Swap { .. }
            | ActionKind::EmergencyHeal { .. } => 0,
        }
    }
}

/// A specific roster member on a specific side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorRef {
    pub side: SideId,
    pub member: usize,
}

impl ActorRef {
    pub fn new(side: SideId, member: usize) -> Self {
        Self { side, member }
    }
}

impl std::fmt::Display for ActorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.side, self.member)
    }
}

/// A declared action waiting to be scheduled
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub actor: ActorRef,
    pub kind: ActionKind,
    /// Replaces the kind's base tier when set
    pub priority_override: Option<i8>,
    /// Declaration time, only used to break ties
    pub submitted_at: u64,
}

impl Action {
    pub fn new(actor: ActorRef, kind: ActionKind, submitted_at: u64) -> Self {
        Self {
            actor,
            kind,
            priority_override: None,
            submitted_at,
        }
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority_override = Some(priority);
        self
    }

    pub fn tag(&self) -> ActionTag {
        self.kind.tag()
    }

    pub fn base_priority(&self) -> i8 {
        self.priority_override
            .unwrap_or_else(|| self.kind.tag().base_priority())
    }
}

/// Persistent priority bonus or penalty attached to a combatant
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriorityModifier {
    pub name: String,
    pub value: i8,
    /// Action kinds this modifier affects
    pub applies_to: Vec<ActionTag>,
}

impl PriorityModifier {
    pub fn new(name: impl Into<String>, value: i8, applies_to: Vec<ActionTag>) -> Self {
        Self {
            name: name.into(),
            value,
            applies_to,
        }
    }

    pub fn applies(&self, tag: ActionTag) -> bool {
        self.applies_to.contains(&tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_tiers() {
        assert_eq!(ActionKind::attack().tag().base_priority(), 0);
        assert_eq!(ActionKind::quick_attack().tag().base_priority(), 1);
        assert_eq!(ActionKind::Defend.tag().base_priority(), 1);
        assert_eq!(ActionKind::Meditate.tag().base_priority(), -1);
        assert_eq!(
            ActionKind::EmergencyHeal { amount: None }.tag().base_priority(),
            2
        );
        assert_eq!(
            ActionKind::Skill(SkillDescriptor::single("Spark", 5))
                .tag()
                .base_priority(),
            0
        );
    }

    #[test]
    fn test_all_tiers_within_bounds() {
        for tag in ActionTag::ALL {
            let p = tag.base_priority();
            assert!((MIN_PRIORITY..=MAX_PRIORITY).contains(&p), "{tag}");
        }
    }

    #[test]
    fn test_priority_override() {
        let actor = ActorRef::new(SideId::A, 0);
        let action = Action::new(actor, ActionKind::Meditate, 0);
        assert_eq!(action.base_priority(), -1);

        let action = action.with_priority(2);
        assert_eq!(action.base_priority(), 2);
    }

    #[test]
    fn test_skill_instance_modifier() {
        let skill = SkillDescriptor::single("Blitz", 10).with_priority(1);
        let kind = ActionKind::Skill(skill);

        assert_eq!(kind.instance_modifier(), 1);
        assert_eq!(kind.cost(), 10);
        assert_eq!(ActionKind::Defend.instance_modifier(), 0);
    }

    #[test]
    fn test_modifier_applies() {
        let modifier = PriorityModifier::new("haste", 1, vec![ActionTag::Attack]);
        assert!(modifier.applies(ActionTag::Attack));
        assert!(!modifier.applies(ActionTag::QuickAttack));
    }

    #[test]
    fn test_actor_display() {
        assert_eq!(ActorRef::new(SideId::B, 2).to_string(), "B#2");
    }
}
