//! End-to-end letter composition through Project and the CLI route table

use flockfill::cli::{Commands, RunContext};
use flockfill::compose::MANIFEST_FILE;
use flockfill::config::FlockfillConfig;
use flockfill::error::FillError;
use flockfill::project::Project;
use std::fs;

use crate::integration::test_utils::project_fixture;

fn seeded_config(seed: u64) -> FlockfillConfig {
    let mut config = FlockfillConfig::default();
    config.sampling.seed = Some(seed);
    config
}

#[test]
fn test_render_writes_one_letter_per_recipient() {
    let temp = project_fixture();
    let project = Project::new(temp.path(), seeded_config(3));

    let (dir, count) = project.render(None).unwrap();
    assert_eq!(count, 2);
    assert_eq!(dir, temp.path().join("output"));

    let amy = fs::read_to_string(dir.join("Wu_Amy.txt")).unwrap();
    assert_eq!(
        amy,
        "June 1, 2026\n\n\
         Dear Amy Wu,\n\n\
         She did a overall work in Robotics Camp. She did a final work in Robotics Camp.\n\n\
         Dr. Kim\nLead Instructor\n"
    );
    let ben = fs::read_to_string(dir.join("Ortiz_Ben.txt")).unwrap();
    assert!(ben.contains("He did b overall work in Robotics Camp."));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest["letters"][0]["recipient"], "Amy Wu");
    assert_eq!(manifest["letters"][1]["file"], "Ortiz_Ben.txt");
}

#[test]
fn test_strict_render_rejects_unbound_slots() {
    let temp = project_fixture();
    fs::write(
        temp.path().join("genre").join("genre.txt"),
        "Dear {first_name},\n\n{sent_homework}\n",
    )
    .unwrap();

    let mut config = seeded_config(1);
    config.sampling.strict = true;
    let err = Project::new(temp.path(), config).render(None).unwrap_err();
    assert!(matches!(err, FillError::UnresolvedSlots { ref slots, .. } if slots == &vec!["sent_homework".to_string()]));

    let (dir, _) = Project::new(temp.path(), seeded_config(1))
        .render(None)
        .unwrap();
    let amy = fs::read_to_string(dir.join("Wu_Amy.txt")).unwrap();
    assert!(amy.ends_with("{sent_homework}\n"));
}

#[test]
fn test_cli_render_to_explicit_output() {
    let temp = project_fixture();
    let out = temp.path().join("letters");
    let ctx = RunContext::new(temp.path().to_path_buf(), None)
        .unwrap()
        .with_seed(Some(9));

    let message = ctx
        .execute(&Commands::Render {
            output: Some(out.clone()),
            strict: true,
            verbatim_info: false,
        })
        .unwrap();
    assert!(message.starts_with("Wrote 2 letter(s)"));
    assert!(out.join("Wu_Amy.txt").exists());
    assert!(!temp.path().join("output").exists());
}

#[test]
fn test_cli_names_and_check() {
    let temp = project_fixture();
    let ctx = RunContext::new(temp.path().to_path_buf(), None).unwrap();

    let names = ctx
        .execute(&Commands::Names {
            extra_words: "STEM".to_string(),
        })
        .unwrap();
    assert_eq!(names, "Amy\nBen\nOrtiz\nSTEM\nWu");

    let check = ctx
        .execute(&Commands::Check {
            format: "json".to_string(),
        })
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&check).unwrap();
    assert_eq!(report["recipients"], 2);
    assert_eq!(report["missing_pools"].as_array().unwrap().len(), 0);
    assert_eq!(report["grade_counts"]["participation"]["B"], 2);
}

#[test]
fn test_cli_bind_prints_rendered_slots() {
    let temp = project_fixture();
    let ctx = RunContext::new(temp.path().to_path_buf(), None)
        .unwrap()
        .with_seed(Some(2));
    let out = ctx.execute(&Commands::Bind).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[1]["she"], serde_json::Value::Null);
    assert_eq!(rows[1]["he"], "he");
    assert_eq!(rows[0]["word_hobby"], "chess");
}

#[test]
fn test_cli_pools_lists_inventory() {
    let temp = project_fixture();
    let ctx = RunContext::new(temp.path().to_path_buf(), None).unwrap();
    let out = ctx
        .execute(&Commands::Pools {
            format: "json".to_string(),
        })
        .unwrap();
    let pools: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(pools.as_array().unwrap().len(), 12);
    assert_eq!(pools[0]["category"], "assignment");
    assert_eq!(pools[0]["class_label"], "a");
    assert_eq!(pools[0]["phrases"], 1);
}
