use std::fs;
use std::os::unix::fs::symlink;

use predicates::prelude::*;

mod common;
use common::TestContext;

fn tree_a(ctx: &TestContext) -> Result<(), Box<dyn std::error::Error>> {
    ctx.create_file("source_a/aaa/aaa", "")?;
    ctx.create_file("source_a/aaa/bbb", "")?;
    Ok(())
}

fn tree_b(ctx: &TestContext) -> Result<(), Box<dyn std::error::Error>> {
    ctx.create_file("source_b/aaa/ddd", "")?;
    ctx.create_file("source_b/aaa/eee", "")?;
    Ok(())
}

fn tree_d(ctx: &TestContext) -> Result<(), Box<dyn std::error::Error>> {
    ctx.create_file("source_d/aaa/ggg", "")?;
    ctx.create_file("source_d/aaa/hhh", "")?;
    Ok(())
}

#[test]
fn test_unstow_with_basic_scenario_removes_link_but_not_dest() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    tree_a(&ctx)?;
    let dest = ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "source_a", "dest"]).success();
    ctx.run_dploy(&["unstow", "source_a", "dest"]).success();

    assert!(!dest.join("aaa").exists());
    assert!(dest.exists());
    Ok(())
}

#[test]
fn test_unstow_with_broken_link_at_dest_conflicts() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    tree_a(&ctx)?;
    let dest = ctx.create_dir("dest")?;
    symlink("non_existant_source", dest.join("aaa"))?;

    ctx.run_dploy(&["unstow", "source_a", "dest"])
        .failure()
        .stderr(predicate::str::contains("Conflicts with existing symlink"));
    Ok(())
}

#[test]
fn test_unstow_with_stray_broken_link_inside_dest_dir_is_harmless() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    tree_a(&ctx)?;
    let dest = ctx.create_dir("dest")?;
    ctx.run_dploy(&["stow", "source_a", "dest"]).success();
    symlink(
        "non_existant_source",
        dest.join("aaa").join("non_existant_source"),
    )?;

    ctx.run_dploy(&["unstow", "source_a", "dest"]).success();
    Ok(())
}

#[test]
fn test_unstow_with_non_existant_source() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    ctx.create_dir("dest")?;

    ctx.run_dploy(&["unstow", "missing_source", "dest"])
        .failure()
        .stderr(predicate::str::contains("No such directory"));
    Ok(())
}

#[test]
fn test_unstow_folding_basic() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    tree_a(&ctx)?;
    tree_b(&ctx)?;
    let dest = ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "source_a", "source_b", "dest"]).success();
    assert!(dest.join("aaa").is_dir());

    ctx.run_dploy(&["unstow", "source_b", "dest"]).success();
    assert!(dest.join("aaa").is_symlink());
    assert_eq!(
        fs::read_link(dest.join("aaa"))?,
        std::path::Path::new("../source_a/aaa")
    );
    Ok(())
}

#[test]
fn test_unstow_folding_with_multiple_sources() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    tree_a(&ctx)?;
    tree_b(&ctx)?;
    tree_d(&ctx)?;
    let dest = ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "source_a", "source_b", "source_d", "dest"])
        .success();
    ctx.run_dploy(&["unstow", "source_b", "source_d", "dest"]).success();

    assert!(dest.join("aaa").is_symlink());
    Ok(())
}

#[test]
fn test_unstow_folding_disqualified_by_stray_symlink() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    tree_a(&ctx)?;
    tree_b(&ctx)?;
    tree_d(&ctx)?;
    let dest = ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "source_a", "source_b", "dest"]).success();
    let stray = dest.join("aaa").join("ggg");
    let stray_source = ctx.path().join("source_d/aaa/ggg");
    ctx.run_dploy(&["link", stray_source.to_str().unwrap(), stray.to_str().unwrap()])
        .success();

    ctx.run_dploy(&["unstow", "source_a", "source_b", "dest"]).success();
    assert!(stray.is_symlink());
    assert!(dest.join("aaa").is_dir());
    Ok(())
}

#[test]
fn test_unstow_folding_not_triggered_while_another_source_remains() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    tree_a(&ctx)?;
    tree_b(&ctx)?;
    tree_d(&ctx)?;
    let dest = ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "source_a", "source_b", "source_d", "dest"])
        .success();
    ctx.run_dploy(&["unstow", "source_b", "dest"]).success();

    assert!(!dest.join("aaa").is_symlink());
    assert!(dest.join("aaa").is_dir());
    Ok(())
}

#[test]
fn test_unstow_folding_all_sources_removes_directory() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    tree_a(&ctx)?;
    tree_b(&ctx)?;
    let dest = ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "source_a", "source_b", "dest"]).success();
    ctx.run_dploy(&["unstow", "source_a", "source_b", "dest"]).success();

    assert!(!dest.join("aaa").exists());
    Ok(())
}

#[test]
fn test_unstow_folding_leaves_unrelated_existing_file_alone() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    tree_a(&ctx)?;
    tree_b(&ctx)?;
    let dest = ctx.create_dir("dest")?;
    ctx.create_dir("dest/aaa")?;
    let a_file = dest.join("aaa").join("a_file");
    fs::write(&a_file, "")?;

    ctx.run_dploy(&["stow", "source_a", "source_b", "dest"]).success();
    ctx.run_dploy(&["unstow", "source_a", "dest"]).success();

    assert!(a_file.exists());
    Ok(())
}
