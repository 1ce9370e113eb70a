use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn command_last_help() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("seqcov")?;
    cmd.arg("last")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("best"))
        .stdout(predicate::str::contains("connect"));

    Ok(())
}

#[test]
fn command_last_best() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("best")
        .arg("tests/last/transcripts.maf")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 4);
    let pairs: Vec<(&str, &str)> = stdout
        .lines()
        .map(|e| {
            let fields: Vec<&str> = e.split('\t').collect();
            (fields[0], fields[1])
        })
        .collect();
    assert_eq!(
        pairs,
        vec![("s1", "tx1"), ("s2", "tx2"), ("s2", "tx3"), ("s3", "tx3")]
    );

    // the alignment of s1 to tx1 covers both sides completely
    let first: Vec<&str> = stdout.lines().next().unwrap().split('\t').collect();
    assert_eq!(first.len(), 16);
    assert_eq!(first[2], "80");
    assert_eq!(first[13], "40");
    assert_eq!(first[14], "1.0000");
    assert_eq!(first[15], "1.0000");

    Ok(())
}

#[test]
fn command_last_best_representative() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("best")
        .arg("tests/last/transcripts.maf")
        .arg("--representative")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.contains("s2\ttx2\t40"));
    assert!(!stdout.contains("s2\ttx3"));

    Ok(())
}

#[test]
fn command_last_complete() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("complete")
        .arg("tests/last/transcripts.maf")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "2\t2\n");

    Ok(())
}

#[test]
fn command_last_complete_names() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let names = temp.path().join("names.lst");

    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("complete")
        .arg("tests/last/transcripts.maf")
        .arg("--subject-threshold")
        .arg("0.5")
        .arg("--names")
        .arg(&names)
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    // s2 now completes both tx2 and tx3
    assert_eq!(stdout, "3\t1\n");
    assert_eq!(fs::read_to_string(&names)?, "tx1\n");

    Ok(())
}

#[test]
fn command_last_gaps() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("gaps")
        .arg("tests/last/transcripts.maf")
        .arg("tests/last/transcripts.fa")
        .arg("--min-len")
        .arg("3")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("tx3\tgap\t21\t25\t5\t1.0000\t1.0000\n"));
    assert!(stdout.contains("tx3\tcovered\t1\t20\t20\t"));
    assert!(stdout.contains("tx3\tcovered\t26\t40\t15\t"));
    assert!(stdout.contains("tx1\tcovered\t1\t40\t40\t0.5000\t"));
    assert!(!stdout.contains("tx1\tgap"));
    assert!(!stdout.contains("tx2\tgap"));

    Ok(())
}

#[test]
fn command_last_gaps_min_len() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("gaps")
        .arg("tests/last/transcripts.maf")
        .arg("tests/last/transcripts.fa")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    // the 5 bp gap of tx3 is below the default of 10
    assert!(!stdout.contains("\tgap\t"));
    assert!(stdout.contains("tx3\tcovered\t26\t40\t15\t"));

    Ok(())
}

#[test]
fn command_last_connect_depth() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("connect")
        .arg("tests/last/transcripts.maf")
        .arg("--depth")
        .arg("tests/last/tx3.depth.tsv")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("tx1\t40\t0\t40\t0\t0\n"));
    assert!(stdout.contains("tx2\t20\t0\t20\t0\t0\n"));
    assert!(stdout.contains("tx3\t40\t0\t35\t0\t5\n"));

    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("connect")
        .arg("tests/last/transcripts.maf")
        .arg("--depth")
        .arg("tests/last/tx3.depth.tsv")
        .arg("--min-depth")
        .arg("10")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("tx3\t40\t5\t35\t0\t0\n"));

    Ok(())
}

#[test]
fn command_last_connect_reads() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let names = temp.path().join("names.lst");
    fs::write(&names, "tx3\n")?;

    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("connect")
        .arg("tests/last/transcripts.maf")
        .arg("--reads")
        .arg("tests/last/reads.maf")
        .arg("--names")
        .arg(&names)
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "tx3\t40\t0\t35\t0\t5\n");

    Ok(())
}

#[test]
fn command_last_connect_needs_depth() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("seqcov")?;
    cmd.arg("last")
        .arg("connect")
        .arg("tests/last/transcripts.maf")
        .assert()
        .failure();

    Ok(())
}

#[test]
fn command_last_malformed() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let input = temp.path().join("bad.maf");
    fs::write(
        &input,
        "a score=10 EG2=1 E=1\ns tx1 0 4 + 4 ACGT\ns q1 0 4 + 4 ACG\n",
    )?;

    let mut cmd = Command::cargo_bin("seqcov")?;
    cmd.arg("last")
        .arg("best")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));

    Ok(())
}

#[test]
fn command_last_gaps_stats() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("gaps")
        .arg("tests/last/transcripts.maf")
        .arg("tests/last/transcripts.fa")
        .arg("--stats")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    // without reads every missing base has low read depth
    assert_eq!(stdout, "tx1\t40\t0\t0\ntx2\t20\t0\t0\ntx3\t40\t5\t5\n");

    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("gaps")
        .arg("tests/last/transcripts.maf")
        .arg("tests/last/transcripts.fa")
        .arg("--stats")
        .arg("--reads")
        .arg("tests/last/tx3.depth.tsv")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "tx1\t40\t0\t0\ntx2\t20\t0\t0\ntx3\t40\t5\t0\n");

    Ok(())
}

#[test]
fn command_last_complete_query_threshold() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let input = temp.path().join("scaffold.maf");
    // tx1 aligns in full to a fifth of a scaffold
    fs::write(
        &input,
        "a score=20 EG2=1 E=1\n\
         s tx1 0 20 + 20 AAAACCCCGGGGTTTTAAAA\n\
         s scf1 40 20 + 100 AAAACCCCGGGGTTTTAAAA\n",
    )?;

    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd.arg("last").arg("complete").arg(&input).output()?;
    assert_eq!(String::from_utf8(output.stdout)?, "1\t1\n");

    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("last")
        .arg("complete")
        .arg(&input)
        .arg("--query-threshold")
        .arg("0.95")
        .output()?;
    assert_eq!(String::from_utf8(output.stdout)?, "0\t0\n");

    Ok(())
}
