#[cfg(test)]
mod tests {
    use crate::{
        AreaEffect, AreaPattern, ParseError, SkillTarget, parse_combatant, parse_roster,
        parse_skill,
    };

    #[test]
    fn test_parse_combatant_minimal() {
        let json = r#"{"name": "Kael", "maxHealth": 120, "attack": 40, "defense": 20}"#;
        let record = parse_combatant(json).unwrap();

        assert_eq!(record.name, "Kael");
        assert_eq!(record.max_health, Some(120));
        assert_eq!(record.speed, None);
        assert!(record.skills.is_empty());
        assert_eq!(record.identity(), "Kael");
    }

    #[test]
    fn test_parse_combatant_aliases() {
        let json = r#"{"id": "c-7", "name": "Mira", "hp": 90, "mana": 60, "class": "Arcano"}"#;
        let record = parse_combatant(json).unwrap();

        assert_eq!(record.max_health, Some(90));
        assert_eq!(record.max_resource, Some(60));
        assert_eq!(record.class.as_deref(), Some("Arcano"));
        assert_eq!(record.identity(), "c-7");
    }

    #[test]
    fn test_parse_combatant_missing_name() {
        let json = r#"{"maxHealth": 120}"#;
        let result = parse_combatant(json);

        assert!(matches!(result, Err(ParseError::MissingField(field)) if field == "name"));
    }

    #[test]
    fn test_parse_combatant_empty() {
        assert!(matches!(parse_combatant("  "), Err(ParseError::EmptyRecord)));
    }

    #[test]
    fn test_parse_combatant_invalid_json() {
        assert!(matches!(
            parse_combatant("{name: nope"),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_roster_size() {
        let json = r#"[{"name": "A"}, {"name": "B"}]"#;
        let result = parse_roster(json);

        assert!(matches!(
            result,
            Err(ParseError::RosterSize {
                expected: 3,
                actual: 2
            })
        ));

        let json = r#"[{"name": "A"}, {"name": "B"}, {"name": "C"}]"#;
        assert_eq!(parse_roster(json).unwrap().len(), 3);
    }

    #[test]
    fn test_parse_single_skill_defaults() {
        let json = r#"{"name": "Piercing Strike", "cost": 15}"#;
        let skill = parse_skill(json).unwrap();

        assert_eq!(skill.cost, 15);
        assert_eq!(skill.priority, 0);
        assert_eq!(skill.target, SkillTarget::Single);
        assert!(!skill.is_area());
    }

    #[test]
    fn test_parse_area_skill() {
        let json = r#"{
            "name": "Shock Wave",
            "cost": 25,
            "target": {"kind": "area", "pattern": "decreasing", "flatBase": 35}
        }"#;
        let skill = parse_skill(json).unwrap();

        match skill.target {
            SkillTarget::Area(effect) => {
                assert_eq!(effect.pattern, AreaPattern::Decreasing);
                assert_eq!(effect.flat_base, 35);
                assert_eq!(effect.multiplier, 2.0);
                assert!(!effect.special);
                assert!(effect.reserve_protection);
            }
            SkillTarget::Single => panic!("expected area skill"),
        }
    }

    #[test]
    fn test_parse_skill_with_status() {
        let json = r#"{"name": "Venom Fang", "cost": 10, "inflicts": {"status": "poison", "duration": 3}}"#;
        let skill = parse_skill(json).unwrap();

        let inflicts = skill.inflicts.unwrap();
        assert_eq!(inflicts.status, "poison");
        assert_eq!(inflicts.duration, 3);
    }

    #[test]
    fn test_area_presets() {
        assert_eq!(AreaEffect::preset("ice storm"), Some(AreaEffect::ice_storm()));
        assert_eq!(AreaEffect::preset("Arrow-Rain"), Some(AreaEffect::arrow_rain()));
        assert_eq!(AreaEffect::preset("meteor"), None);

        let burst = AreaEffect::fire_burst();
        assert_eq!(burst.pattern, AreaPattern::Focused);
        assert!(burst.special);
    }
}
