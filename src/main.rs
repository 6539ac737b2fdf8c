//! repofs - a read-only FUSE filesystem that projects a git repository's
//! history onto a hierarchical namespace.
//!
//! ```text
//! repofs <repo> <mount> [--hash-trees] [--no-ref-symlinks] [--nocache]
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use repofs::fs::RepoFs;
use repofs::git::RepoAccessor;

/// Mount a git repository's history as a read-only filesystem.
#[derive(Parser)]
#[command(name = "repofs")]
#[command(about = "Project a git repository's history onto a filesystem", long_about = None)]
struct Cli {
    /// Git repository to mount (a directory containing a `.git` subdirectory).
    repo: PathBuf,

    /// Empty directory to mount the filesystem at.
    mount: PathBuf,

    /// Bucket commits-by-hash into a 256-ary three-level hex tree, keyed by
    /// the first six hex digits of each commit id.
    #[arg(long)]
    hash_trees: bool,

    /// Mount ref paths (`branches/...`, `tags/...`) as inlined directories
    /// instead of symbolic links into commits-by-hash.
    #[arg(long)]
    no_ref_symlinks: bool,

    /// Disable all Repo Accessor memoisation; every request re-queries the
    /// repository.
    #[arg(long)]
    nocache: bool,

    /// Stay attached to the controlling terminal. Accepted for interface
    /// compatibility with other FUSE mount launchers; repofs never forks
    /// into the background, so this flag changes nothing.
    #[arg(short = 'f', long)]
    foreground: bool,

    /// Raw FUSE mount option (comma-separated, may be repeated), e.g.
    /// `-o allow_other,default_permissions`.
    #[arg(short = 'o', long = "option")]
    options: Vec<String>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Translates `-o key[,key2=val2,...]` into `fuser::MountOption`s, mapping
/// the handful of well-known flag names to their typed variant and passing
/// everything else through as `MountOption::CUSTOM`.
fn parse_mount_option(opt: &str) -> fuser::MountOption {
    match opt {
        "allow_other" => fuser::MountOption::AllowOther,
        "allow_root" => fuser::MountOption::AllowRoot,
        "auto_unmount" => fuser::MountOption::AutoUnmount,
        "default_permissions" => fuser::MountOption::DefaultPermissions,
        other => fuser::MountOption::CUSTOM(other.to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if cli.foreground {
        tracing::debug!("--foreground requested; repofs always stays attached");
    }

    if !cli.repo.join(".git").exists() {
        eprintln!("Not a git repository: {}", cli.repo.display());
        std::process::exit(1);
    }

    if !cli.mount.is_dir() {
        eprintln!("Mount point does not exist or is not a directory: {}", cli.mount.display());
        std::process::exit(1);
    }
    match std::fs::read_dir(&cli.mount) {
        Ok(mut entries) if entries.next().is_some() => {
            eprintln!("Mount point is not empty: {}", cli.mount.display());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to read mount point {}: {}", cli.mount.display(), e);
            std::process::exit(1);
        }
        Ok(_) => {}
    }

    let repo_path = std::fs::canonicalize(&cli.repo).unwrap_or_else(|_| cli.repo.clone());
    let mount_path = std::fs::canonicalize(&cli.mount).unwrap_or_else(|_| cli.mount.clone());

    tracing::info!(repo = %repo_path.display(), nocache = cli.nocache, "opening repository");
    let accessor = match RepoAccessor::open(&repo_path, cli.nocache) {
        Ok(accessor) => accessor,
        Err(e) => {
            eprintln!("Failed to open repository: {e}");
            std::process::exit(1);
        }
    };

    let repofs = match RepoFs::new(accessor, &repo_path, &mount_path, cli.hash_trees, cli.no_ref_symlinks) {
        Ok(repofs) => repofs,
        Err(e) => {
            eprintln!("Failed to prepare mount: {e}");
            std::process::exit(1);
        }
    };

    let mut mount_options = vec![fuser::MountOption::RO, fuser::MountOption::FSName("repofs".to_string())];
    for raw in &cli.options {
        mount_options.extend(raw.split(',').map(parse_mount_option));
    }

    tracing::info!(
        mount = %mount_path.display(),
        hash_trees = cli.hash_trees,
        no_ref_symlinks = cli.no_ref_symlinks,
        "mounting"
    );
    fuser::mount2(repofs, &mount_path, &mount_options)?;
    tracing::info!("unmounted");

    Ok(())
}
