use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Manage the Folio blog and admin session")]
pub struct Cli {
    /// Directory holding the blog and session buckets.
    #[arg(long, global = true, env = "FOLIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version.
    Version,

    /// Sign in as admin.
    Login {
        #[arg(long)]
        username: String,

        #[arg(long, env = "FOLIO_LOGIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out.
    Logout,

    /// Show whether an admin session is active.
    Status,

    /// Read and edit blog posts.
    #[command(subcommand)]
    Posts(PostsCommand),

    /// Sanitize an HTML fragment from FILE (or stdin) and print it.
    Sanitize { file: Option<PathBuf> },
}

#[derive(Subcommand, Debug)]
pub enum PostsCommand {
    /// List published posts.
    List {
        /// Include drafts (admin only).
        #[arg(long)]
        all: bool,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        tag: Option<String>,
    },

    /// Print one post with sanitized content.
    Show {
        id: i64,

        /// Print content unsanitized (admin only).
        #[arg(long)]
        raw: bool,
    },

    /// Create a post (admin only). Drafts unless --publish is given.
    New {
        #[arg(long)]
        title: String,

        /// Markdown file with the post body, `-` for stdin.
        #[arg(long)]
        content_file: PathBuf,

        #[command(flatten)]
        meta: PostMeta,
    },

    /// Update fields of an existing post (admin only).
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        /// Markdown file with the post body, `-` for stdin.
        #[arg(long)]
        content_file: Option<PathBuf>,

        #[command(flatten)]
        meta: PostMeta,
    },

    /// Delete a post (admin only).
    Delete { id: i64 },

    /// List categories of published posts.
    Categories,
}

#[derive(Args, Debug, Default)]
pub struct PostMeta {
    #[arg(long)]
    pub excerpt: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub cover_image: Option<String>,

    /// Tag (repeatable). Replaces existing tags when given.
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// e.g. "5 min read"; estimated from the content when empty.
    #[arg(long)]
    pub read_time: Option<String>,

    #[arg(long)]
    pub author_name: Option<String>,

    #[arg(long)]
    pub author_avatar: Option<String>,

    #[arg(long)]
    pub author_role: Option<String>,

    /// Featured link as `URL|TITLE` (repeatable). Replaces existing links.
    #[arg(long = "golden-link")]
    pub golden_links: Vec<String>,

    /// Mark as draft.
    #[arg(long, conflicts_with = "publish")]
    pub draft: bool,

    /// Mark as published.
    #[arg(long)]
    pub publish: bool,
}
