mod common;
use common::TestContext;

#[test]
fn test_ignore_everything_via_wildcard_pattern() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    ctx.create_file("source_a/aaa/aaa", "")?;
    ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "--ignore", "*", "source_a", "dest"]).success();
    assert!(!ctx.path().join("dest/aaa").exists());
    Ok(())
}

#[test]
fn test_ignore_a_single_top_level_entry() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    ctx.create_file("source_a/aaa/aaa", "")?;
    ctx.create_file("source_a/bbb", "")?;
    ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "--ignore", "aaa", "source_a", "dest"]).success();
    assert!(!ctx.path().join("dest/aaa").exists());
    assert!(ctx.path().join("dest/bbb").is_symlink());
    Ok(())
}

#[test]
fn test_ignore_via_dploystowignore_file_in_source_root() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    ctx.create_file("source_a/aaa/aaa", "")?;
    ctx.create_file("source_a/bbb", "")?;
    ctx.create_file("source_a/.dploystowignore", "aaa\n")?;
    ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "source_a", "dest"]).success();
    assert!(!ctx.path().join("dest/aaa").exists());
    assert!(ctx.path().join("dest/bbb").is_symlink());
    assert!(!ctx.path().join("dest/.dploystowignore").exists());
    Ok(())
}

#[test]
fn test_ignore_bare_pattern_matches_at_any_depth() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    ctx.create_file("source_a/bbb/aaa", "")?;
    ctx.create_file("source_a/bbb/ccc", "")?;
    ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "--ignore", "aaa", "source_a", "dest"]).success();
    assert!(!ctx.path().join("dest/bbb/aaa").exists());
    assert!(ctx.path().join("dest/bbb/ccc").is_symlink());
    Ok(())
}

#[test]
fn test_ignore_anchored_pattern_only_matches_at_root() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    ctx.create_file("source_a/aaa", "")?;
    ctx.create_file("source_a/bbb/aaa", "")?;
    ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "--ignore", "/aaa", "source_a", "dest"]).success();
    assert!(!ctx.path().join("dest/aaa").exists());
    assert!(ctx.path().join("dest/bbb/aaa").is_symlink());
    Ok(())
}

#[test]
fn test_ignore_patterns_apply_independently_per_source() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = TestContext::new()?;
    ctx.create_file("source_a/aaa", "")?;
    ctx.create_file("source_b/aaa", "")?;
    ctx.create_dir("dest")?;

    ctx.run_dploy(&["stow", "--ignore", "aaa", "source_a", "dest"]).success();
    ctx.run_dploy(&["stow", "source_b", "dest"]).success();

    assert!(ctx.path().join("dest/aaa").is_symlink());
    Ok(())
}
