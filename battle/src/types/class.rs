//! Combat classes and the advantage triangle

/// Class tag carried by every combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum CombatClass {
    Fighter = 0,
    Armsmaster = 1,
    Arcanist = 2,
    /// Any class outside the triangle
    #[default]
    Unaligned = 3,
}

/// Which side of a matchup holds the class advantage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Advantage {
    Attacker,
    Defender,
    Neutral,
}

/// BEATS[attacker][defender]: attacker's class beats the defender's
#[rustfmt::skip]
pub static BEATS: [[bool; 4]; 4] = [
    //               Fig    Arm    Arc    Una
    /* Fighter  */ [false, true,  false, false],
    /* Armsmstr */ [false, false, true,  false],
    /* Arcanist */ [true,  false, false, false],
    /* Unalignd */ [false, false, false, false],
];

impl CombatClass {
    /// The three classes that form the triangle
    pub const TRIANGLE: [CombatClass; 3] = [
        CombatClass::Fighter,
        CombatClass::Armsmaster,
        CombatClass::Arcanist,
    ];

    /// Parse a class tag from a record
    pub fn from_protocol(s: &str) -> Self {
        let normalized = s.trim().to_lowercase();

        match normalized.as_str() {
            "fighter" | "lutador" => CombatClass::Fighter,
            "armsmaster" | "armamentista" => CombatClass::Armsmaster,
            "arcanist" | "arcano" => CombatClass::Arcanist,
            _ => CombatClass::Unaligned,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CombatClass::Fighter => "Fighter",
            CombatClass::Armsmaster => "Armsmaster",
            CombatClass::Arcanist => "Arcanist",
            CombatClass::Unaligned => "Unaligned",
        }
    }

    /// Does this class beat `other`?
    pub fn beats(&self, other: CombatClass) -> bool {
        BEATS[*self as usize][other as usize]
    }

    /// The class this one beats, if it sits on the triangle
    pub fn strong_against(&self) -> Option<CombatClass> {
        Self::TRIANGLE.into_iter().find(|&c| self.beats(c))
    }

    /// The class that beats this one, if it sits on the triangle
    pub fn weak_against(&self) -> Option<CombatClass> {
        Self::TRIANGLE.into_iter().find(|c| c.beats(*self))
    }
}

impl std::fmt::Display for CombatClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve the advantage for an attacker/defender pair
pub fn advantage(attacker: CombatClass, defender: CombatClass) -> Advantage {
    if attacker.beats(defender) {
        Advantage::Attacker
    } else if defender.beats(attacker) {
        Advantage::Defender
    } else {
        Advantage::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CombatClass; 4] = [
        CombatClass::Fighter,
        CombatClass::Armsmaster,
        CombatClass::Arcanist,
        CombatClass::Unaligned,
    ];

    #[test]
    fn test_triangle_cycle() {
        assert!(CombatClass::Fighter.beats(CombatClass::Armsmaster));
        assert!(CombatClass::Armsmaster.beats(CombatClass::Arcanist));
        assert!(CombatClass::Arcanist.beats(CombatClass::Fighter));

        assert!(!CombatClass::Armsmaster.beats(CombatClass::Fighter));
        assert!(!CombatClass::Fighter.beats(CombatClass::Fighter));
    }

    #[test]
    fn test_each_class_beats_exactly_one() {
        for class in CombatClass::TRIANGLE {
            let wins = ALL.iter().filter(|&&other| class.beats(other)).count();
            assert_eq!(wins, 1, "{class} should beat exactly one class");
        }
    }

    #[test]
    fn test_advantage_is_never_mutual() {
        for a in ALL {
            for b in ALL {
                assert!(!(a.beats(b) && b.beats(a)));
            }
        }
    }

    #[test]
    fn test_unaligned_is_neutral() {
        for class in ALL {
            assert_eq!(advantage(CombatClass::Unaligned, class), Advantage::Neutral);
            assert_eq!(advantage(class, CombatClass::Unaligned), Advantage::Neutral);
        }
    }

    #[test]
    fn test_advantage_direction() {
        assert_eq!(
            advantage(CombatClass::Fighter, CombatClass::Armsmaster),
            Advantage::Attacker
        );
        assert_eq!(
            advantage(CombatClass::Armsmaster, CombatClass::Fighter),
            Advantage::Defender
        );
    }

    #[test]
    fn test_from_protocol() {
        assert_eq!(CombatClass::from_protocol("Lutador"), CombatClass::Fighter);
        assert_eq!(CombatClass::from_protocol("ARCANIST"), CombatClass::Arcanist);
        assert_eq!(
            CombatClass::from_protocol(" armamentista "),
            CombatClass::Armsmaster
        );
        assert_eq!(CombatClass::from_protocol("Guardião"), CombatClass::Unaligned);
    }

    #[test]
    fn test_strong_and_weak() {
        assert_eq!(
            CombatClass::Fighter.strong_against(),
            Some(CombatClass::Armsmaster)
        );
        assert_eq!(CombatClass::Fighter.weak_against(), Some(CombatClass::Arcanist));
        assert_eq!(CombatClass::Unaligned.strong_against(), None);
    }
}
