/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Model2::elements::{ElementUsage, annotate_elements};
    use crate::Model2::reweight::{WeightAdjustment, find_sentinel, reweight_rules};
    use crate::Model2::rules::RuleSet;
    use crate::errors::Model2Error;
    use crate::settings::{SentinelPolicy, SentinelSelector};
    use approx::assert_relative_eq;

    fn usage(rows: &[(&str, f64)]) -> Vec<ElementUsage> {
        rows.iter()
            .map(|(name, ratio)| ElementUsage {
                element: name.to_string(),
                n_reac: 1,
                n_prod: 1,
                ratio: *ratio,
            })
            .collect()
    }

    fn disabled() -> SentinelPolicy {
        SentinelPolicy {
            selector: SentinelSelector::Disabled,
            reset_weight: 0.001,
        }
    }

    #[test]
    fn test_decision_table() {
        use WeightAdjustment::*;
        assert_eq!(WeightAdjustment::decide(2.0, 1.0), Quadruple);
        assert_eq!(WeightAdjustment::decide(2.0, 0.0), Quadruple);
        assert_eq!(WeightAdjustment::decide(1.0, 1.5), Quarter);
        assert_eq!(WeightAdjustment::decide(0.0, 3.0), Quarter);
        assert_eq!(WeightAdjustment::decide(0.8, 0.5), Double);
        assert_eq!(WeightAdjustment::decide(0.5, 0.8), Halve);
        assert_eq!(WeightAdjustment::decide(3.0, 2.0), Halve);
        assert_eq!(WeightAdjustment::decide(2.0, 3.0), Double);
        // ties and boundaries fall through
        assert_eq!(WeightAdjustment::decide(1.0, 1.0), Unchanged);
        assert_eq!(WeightAdjustment::decide(0.5, 0.5), Unchanged);
        assert_eq!(WeightAdjustment::decide(2.0, 2.0), Unchanged);
        assert_eq!(WeightAdjustment::decide(1.0, 0.5), Unchanged);
        assert_eq!(WeightAdjustment::decide(0.5, 1.0), Unchanged);
    }

    #[test]
    fn test_apply() {
        assert_relative_eq!(WeightAdjustment::Quadruple.apply(0.5), 2.0);
        assert_relative_eq!(WeightAdjustment::Quarter.apply(2.0), 0.5);
        assert_relative_eq!(WeightAdjustment::Double.apply(0.5), 1.0);
        assert_relative_eq!(WeightAdjustment::Halve.apply(3.0), 1.5);
        assert_relative_eq!(WeightAdjustment::Unchanged.apply(3.0), 3.0);
    }

    #[test]
    fn test_unit_ratios_keep_weight() {
        let mut rule_set = RuleSet::from_lines(&["A + B => C + D\t0.7", "--INITIAL"]).unwrap();
        let elements = usage(&[("A", 1.0), ("B", 1.0), ("C", 1.0), ("D", 1.0)]);

        let outcome = reweight_rules(&mut rule_set, &elements, &disabled()).unwrap();
        assert_eq!(outcome.reweights[0].adjustment, WeightAdjustment::Unchanged);
        assert_eq!(rule_set.rules[0].weight, 0.7);
    }

    #[test]
    fn test_means_over_reactants_and_products() {
        let mut rule_set =
            RuleSet::from_lines(&["A + B => C\t1", "C => A + B\t1", "--INITIAL"]).unwrap();
        let elements = usage(&[("A", 3.0), ("B", 0.0), ("C", 0.5)]);

        let outcome = reweight_rules(&mut rule_set, &elements, &disabled()).unwrap();
        let r0 = &outcome.reweights[0];
        assert_relative_eq!(r0.reactant_mean, 1.5);
        assert_relative_eq!(r0.product_mean, 0.5);
        assert_eq!(r0.adjustment, WeightAdjustment::Quadruple);
        assert_eq!(rule_set.rules[0].weight, 4.0);

        let r1 = &outcome.reweights[1];
        assert_eq!(r1.adjustment, WeightAdjustment::Quarter);
        assert_eq!(rule_set.rules[1].weight, 0.25);
        assert_eq!(outcome.count(WeightAdjustment::Quadruple), 1);
        assert_eq!(outcome.count(WeightAdjustment::Quarter), 1);
    }

    #[test]
    fn test_sentinel_reset_overrides_table() {
        let mut rule_set = RuleSet::from_lines(&[
            "A => B\t1",
            "NONE => NONE\t5",
            "--INITIAL",
        ])
        .unwrap();
        // equal means: the table alone would keep 5
        let elements = usage(&[("A", 2.0), ("B", 0.5), ("NONE", 2.0)]);

        let outcome =
            reweight_rules(&mut rule_set, &elements, &SentinelPolicy::default()).unwrap();
        assert_eq!(outcome.sentinel_key.as_deref(), Some("R1"));
        assert_eq!(rule_set.rules[1].weight, 0.001);
        assert!(outcome.reweights[1].sentinel);
        assert_eq!(outcome.reweights[1].new_weight, 0.001);
        // edges keep the table-adjusted weight
        let sentinel_edge = outcome
            .interactions
            .iter()
            .find(|e| e.rule_key == "R1")
            .unwrap();
        assert_eq!(sentinel_edge.updated_weight, 5.0);
        assert_eq!(sentinel_edge.adjustment, WeightAdjustment::Unchanged);
        assert_eq!(sentinel_edge.initial_weight, "5");
    }

    #[test]
    fn test_find_sentinel_selectors() {
        let rule_set = RuleSet::from_lines(&[
            "A => B\t1",
            "NONE => NONE\t1",
            "B => A\t1",
            "--INITIAL",
        ])
        .unwrap();
        let policy = |selector| SentinelPolicy {
            selector,
            reset_weight: 0.01,
        };
        assert_eq!(find_sentinel(&rule_set, &policy(SentinelSelector::Disabled)), None);
        assert_eq!(
            find_sentinel(
                &rule_set,
                &policy(SentinelSelector::Key {
                    key: "R2".to_string()
                })
            ),
            Some(2)
        );
        assert_eq!(
            find_sentinel(
                &rule_set,
                &policy(SentinelSelector::Expression {
                    expression: "NONE=>NONE".to_string()
                })
            ),
            Some(1)
        );
        assert_eq!(find_sentinel(&rule_set, &policy(SentinelSelector::LastRule)), Some(2));
        assert_eq!(
            find_sentinel(
                &rule_set,
                &policy(SentinelSelector::Key {
                    key: "R95".to_string()
                })
            ),
            None
        );
    }

    #[test]
    fn test_unknown_element_is_inconsistent() {
        let mut rule_set = RuleSet::from_lines(&["A => Z\t1", "--INITIAL"]).unwrap();
        let elements = usage(&[("A", 1.0)]);
        match reweight_rules(&mut rule_set, &elements, &disabled()) {
            Err(Model2Error::InconsistentElementSet { element, rule }) => {
                assert_eq!(element, "Z");
                assert_eq!(rule, "R0");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_interactions_follow_rule_order() {
        let mut rule_set =
            RuleSet::from_lines(&["A + B => C\t1", "C => D\t2", "--INITIAL"]).unwrap();
        let names: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let elements = annotate_elements(&names, &rule_set);

        let outcome = reweight_rules(&mut rule_set, &elements, &disabled()).unwrap();
        let labels: Vec<String> = outcome.interactions.iter().map(|e| e.label()).collect();
        assert_eq!(labels, vec!["A (pp) C", "B (pp) C", "C (pp) D"]);
    }
}
