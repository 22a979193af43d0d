//! Shared fixtures: a complete project directory in a temp dir.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const ROSTER: &str = "\
first_name,last_name,gender,assignment,participation,final,overall,mutex,word_hobby
amy,wu,F,A,B,A,A,cohort1,chess
ben,ortiz,M,B,B,C,B,cohort1,
";

pub fn write_pool(root: &Path, category: &str, class_label: &str, body: &str) {
    let dir = root.join("flock").join(category);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.txt", class_label)), body).unwrap();
}

/// Project with every pool the fixture roster references, program info,
/// and a genre skeleton.
pub fn project_fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    for category in ["assignment", "participation", "final", "overall"] {
        for class_label in ["a", "b", "c"] {
            write_pool(
                root,
                category,
                class_label,
                &format!("{{He}} did {} {} work in {{program_name}}.\n", class_label, category),
            );
        }
    }

    let info = root.join("program_info");
    fs::create_dir_all(&info).unwrap();
    fs::write(
        info.join("program_description.txt"),
        "A summer course.\nIt covers robotics.\n",
    )
    .unwrap();
    fs::write(info.join("instructor_signature.txt"), "Dr. Kim\nLead Instructor\n").unwrap();
    fs::write(info.join("date.txt"), "June 1, 2026\n").unwrap();
    fs::write(info.join("program_name.txt"), "Robotics Camp\n").unwrap();

    let genre = root.join("genre");
    fs::create_dir_all(&genre).unwrap();
    fs::write(
        genre.join("genre.txt"),
        "{date}\n\nDear {first_name} {last_name},\n\n{sent_overall}\n{sent_final}\n\n{instructor_signature}\n",
    )
    .unwrap();

    fs::write(root.join("eval.csv"), ROSTER).unwrap();
    temp
}
