#[cfg(test)]
mod tests {
    use crate::Pipelines::analyze_model2::{AnalyzeInputs, analyze};
    use crate::Pipelines::edit_model2::{EditInputs, edit};
    use crate::errors::Model2Error;
    use crate::settings::{AnalysisConfig, ReportScope, SentinelPolicy, SentinelSelector};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::{TempDir, tempdir};

    const MODEL: &str = "% three rule model\n\
                         X => Z\t1\n\
                         \n\
                         X + Y => Z\t2\n\
                         Z => X + Y\t1\n\
                         --INITIAL\n\
                         X\t10\n";
    // X always present, Y gone at timestep 2
    const POE: &str = "Time\tSample\tX\tY\tZ\n\
                       1\t0\t100.000000\t100.000000\t50.000000\n\
                       2\t0\t100.000000\t0.000000\t100.000000\n";
    const POR: &str = "Time\tEvents\tR0\tR1\tR2\n\
                       1\t10\t50.000000\t100.000000\t0.000000\n\
                       2\t4\t25.000000\t100.000000\t0.000000\n";

    struct Workspace {
        dir: TempDir,
        config: AnalysisConfig,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            for (name, content) in [("model.model2", MODEL), ("run.poe", POE), ("run.por", POR)] {
                fs::write(dir.path().join(name), content).unwrap();
            }
            let config = AnalysisConfig {
                output_dir: dir.path().join("results"),
                sentinel: SentinelPolicy {
                    selector: SentinelSelector::LastRule,
                    reset_weight: 0.001,
                },
                ..AnalysisConfig::default()
            };
            Workspace { dir, config }
        }

        fn input(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn read(&self, path: &Path) -> String {
            fs::read_to_string(path).unwrap()
        }
    }

    #[test]
    fn test_edit_pipeline() {
        let ws = Workspace::new();
        let summary = edit(
            &EditInputs::new(ws.input("model.model2"), ws.input("run.poe")),
            &ws.config,
        )
        .unwrap();
        let layout = ws.config.layout();

        assert_eq!(summary.rule_set.len(), 3);
        assert!(summary.unused_elements().is_empty());
        assert_eq!(summary.outcome.sentinel_key.as_deref(), Some("R2"));
        assert_eq!(
            ws.read(&layout.node_annotation()),
            "Element,Nreac,Nprod,Ratio\nX,2,1,2.000\nY,1,1,1.000\nZ,1,2,0.500\n"
        );
        assert_eq!(
            ws.read(&layout.updated_model()),
            "X => Z\t4.0\nX + Y => Z\t8.0\nZ => X + Y\t0.001\n--INITIAL\nX\t10\n"
        );
        assert_eq!(
            ws.read(&layout.network()),
            "X pp Z\nX pp Z\nY pp Z\nZ pp X\nZ pp Y\n"
        );
        assert_eq!(
            ws.read(&layout.edge_annotation()),
            "Edge\tScore_init\tScore_changed\n\
             X (pp) Z\t1\t4.0\n\
             X (pp) Z\t2\t8.0\n\
             Y (pp) Z\t2\t8.0\n\
             Z (pp) X\t1\t0.25\n\
             Z (pp) Y\t1\t0.25\n"
        );
        assert_eq!(summary.written.len(), 4);
    }

    #[test]
    fn test_analyze_after_edit() {
        let ws = Workspace::new();
        edit(
            &EditInputs::new(ws.input("model.model2"), ws.input("run.poe")),
            &ws.config,
        )
        .unwrap();
        let layout = ws.config.layout();

        let inputs = AnalyzeInputs::new(
            ws.input("model.model2"),
            ws.input("run.poe"),
            ws.input("run.por"),
            layout.node_annotation(),
        );
        let summary = analyze(&inputs, &ws.config).unwrap();

        assert_eq!(summary.rule_count, 3);
        assert_eq!(summary.used_rules.len(), 1);
        assert_eq!(summary.used_rules[0].name, "R0");
        assert_eq!(summary.missing_elements, vec!["Y"]);

        assert_eq!(
            ws.read(&layout.rules_applied()),
            "At 1, the rule(s) R0 has or have been used 5 times respectively\n\
             At 2, the rule(s) R0 has or have been used 1 times respectively\n"
        );
        // the element that vanished is reported at timestep 2 only
        assert_eq!(
            ws.read(&layout.lost_reactives()),
            "Timestep : 1, missing elements : \n[]\nTimestep : 2, missing elements : \n[\"Y\"]\n"
        );
        // R1 needs Y and is impossible at timestep 2
        assert_eq!(
            ws.read(&layout.possible_rules()),
            "Timestep : 1\n[\"R0\", \"R1\", \"R2\"]\nTimestep : 2\n[\"R0\", \"R2\"]\n"
        );
        assert_eq!(
            ws.read(&layout.missing_elements_summary()),
            "Element,Nreac,Nprod,Ratio\nY,1,1,1.000\n"
        );
    }

    #[test]
    fn test_analyze_scope_all() {
        let ws = Workspace::new();
        let mut config = ws.config.clone();
        config.report_scope = ReportScope::All;
        let annotation = ws.input("annot_node.csv");
        fs::write(&annotation, "Element,Nreac,Nprod,Ratio\nX,2,1,2.000\nY,1,1,1.000\n").unwrap();

        let inputs = AnalyzeInputs::new(
            ws.input("model.model2"),
            ws.input("run.poe"),
            ws.input("run.por"),
            annotation,
        );
        let summary = analyze(&inputs, &config).unwrap();
        assert_eq!(summary.missing_elements, vec!["Y"]);
        assert_eq!(summary.missing_summary.len(), 1);
    }

    #[test]
    fn test_missing_input_file() {
        let ws = Workspace::new();
        let result = edit(
            &EditInputs::new(ws.input("absent.model2"), ws.input("run.poe")),
            &ws.config,
        );
        assert!(matches!(result, Err(Model2Error::FileNotFound { .. })));
    }

    #[test]
    fn test_model_without_sentinel() {
        let ws = Workspace::new();
        let model = ws.input("broken.model2");
        fs::write(&model, "X => Z\t1\n").unwrap();
        let result = edit(&EditInputs::new(model, ws.input("run.poe")), &ws.config);
        assert!(matches!(result, Err(Model2Error::MissingSentinel { .. })));
    }
}
