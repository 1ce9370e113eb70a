use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

#[test]
fn command_fa_gc() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("fa")
        .arg("gc")
        .arg("tests/last/transcripts.fa")
        .arg("--kmer")
        .arg("10")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "tx1\t0.6\ntx2\t0.8\ntx3\t0.5\n");

    Ok(())
}

#[test]
fn command_fa_gc_total() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let input = temp.path().join("short.fa");
    fs::write(&input, ">short\nacgtgc\n")?;

    let mut cmd = Command::cargo_bin("seqcov")?;
    let output = cmd
        .arg("fa")
        .arg("gc")
        .arg(&input)
        .arg("--total")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    // shorter than the window, lower case counts too
    assert!(stdout.contains("short\t0.6666666666666666\t0.6666666666666666\n"));

    Ok(())
}

#[test]
fn command_fa_split() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let prefix = temp.path().join("tx");

    let mut cmd = Command::cargo_bin("seqcov")?;
    cmd.arg("fa")
        .arg("split")
        .arg("tests/last/transcripts.fa")
        .arg("2")
        .arg(&prefix)
        .assert()
        .success();

    let part0 = fs::read_to_string(temp.path().join("tx_part_0.fa"))?;
    let part1 = fs::read_to_string(temp.path().join("tx_part_1.fa"))?;

    // tx1 fills part 0, tx2 and tx3 go to the lighter part 1
    assert!(part0.starts_with(">tx1\n"));
    assert_eq!(part0.lines().count(), 2);
    assert!(part1.contains(">tx2 second transcript\nAAAACCCCGGGGTTTTAAAA\n"));
    assert!(part1.contains(">tx3\n"));

    Ok(())
}

#[test]
fn command_fa_split_padding() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let prefix = temp.path().join("tx");

    let mut cmd = Command::cargo_bin("seqcov")?;
    cmd.arg("fa")
        .arg("split")
        .arg("tests/last/transcripts.fa")
        .arg("10")
        .arg(&prefix)
        .assert()
        .success();

    assert!(temp.path().join("tx_part_00.fa").is_file());
    assert!(temp.path().join("tx_part_09.fa").is_file());
    assert_eq!(fs::read_to_string(temp.path().join("tx_part_09.fa"))?, "");

    Ok(())
}

#[test]
fn command_fa_split_zero() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let prefix = temp.path().join("tx");

    let mut cmd = Command::cargo_bin("seqcov")?;
    cmd.arg("fa")
        .arg("split")
        .arg("tests/last/transcripts.fa")
        .arg("0")
        .arg(&prefix)
        .assert()
        .failure();

    Ok(())
}
