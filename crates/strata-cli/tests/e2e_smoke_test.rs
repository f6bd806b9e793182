use std::{fs, path::PathBuf};

use tempfile::tempdir;

use strata_cli::{Args, run};

/// Collects all .yml files from a directory
fn collect_yml_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Pipelines live at the workspace root, not in the crate
fn pipelines_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("pipelines")
}

fn args_for(input: &PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_pipelines() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_pipelines = collect_yml_files(pipelines_dir());
    assert!(
        !valid_pipelines.is_empty(),
        "No valid pipelines found in pipelines/"
    );

    let mut failed = Vec::new();

    for pipeline_path in &valid_pipelines {
        let stem = pipeline_path.file_stem().unwrap().to_string_lossy();

        for extension in ["svg", "html"] {
            let output_path = temp_dir.path().join(format!("{stem}.{extension}"));

            match run(&args_for(pipeline_path, output_path.clone())) {
                Ok(_) if !output_path.is_file() => {
                    failed.push((pipeline_path.clone(), "no output written".to_string()));
                }
                Ok(_) => {}
                Err(e) => failed.push((pipeline_path.clone(), e.to_string())),
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nValid pipelines that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid pipeline run(s) failed unexpectedly", failed.len());
    }

    println!("✅ All {} valid pipelines passed", valid_pipelines.len());
}

#[test]
fn e2e_smoke_test_error_pipelines() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_pipelines = collect_yml_files(pipelines_dir().join("errors"));
    assert!(
        !error_pipelines.is_empty(),
        "No error pipelines found in pipelines/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for pipeline_path in &error_pipelines {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            pipeline_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args_for(pipeline_path, output_path.clone())).is_ok() {
            unexpectedly_succeeded.push(pipeline_path.clone());
        }
        assert!(
            !output_path.exists(),
            "{} left an output file behind",
            pipeline_path.display()
        );
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError pipelines that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error pipeline(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!(
        "✅ All {} error pipelines failed as expected",
        error_pipelines.len()
    );
}
