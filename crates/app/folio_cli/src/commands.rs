use std::io::Read;
use std::path::Path;

use folio_core::blog::{self, BlogRepository};
use folio_core::models::blog::{BlogPost, GoldenLink};
use folio_core::sanitize::sanitize;
use log::debug;

use crate::cli::{PostMeta, PostsCommand};
use crate::services::Services;
use crate::{Error, Result};

pub fn login(services: &Services, username: &str, password: &str) -> Result<()> {
    let session = services.auth.login(username, password)?;
    println!("Signed in until {}", session.expires_at.to_rfc3339());
    Ok(())
}

pub fn logout(services: &Services) -> Result<()> {
    services.auth.logout()?;
    println!("Signed out");
    Ok(())
}

pub fn status(services: &Services) -> Result<()> {
    match services.auth.require_session() {
        Ok(session) => println!("Signed in until {}", session.expires_at.to_rfc3339()),
        Err(_) => println!("Signed out"),
    }
    Ok(())
}

pub fn sanitize_input(file: Option<&Path>) -> Result<()> {
    let html = read_source(file)?;
    println!("{}", sanitize(&html));
    Ok(())
}

pub fn posts(services: &Services, command: PostsCommand) -> Result<()> {
    match command {
        PostsCommand::List { all, category, tag } => list(services, all, category, tag),
        PostsCommand::Show { id, raw } => show(services, id, raw),
        PostsCommand::New {
            title,
            content_file,
            meta,
        } => {
            services.auth.require_session()?;
            let content = read_source(Some(&content_file))?;
            let mut post = BlogPost::new(services.clock.now().timestamp_millis(), title, content);
            apply_meta(&mut post, meta)?;
            let saved = services.repo.save(blog::prepare(post)?)?;
            println!("Saved post {}", saved.id);
            Ok(())
        }
        PostsCommand::Edit {
            id,
            title,
            content_file,
            meta,
        } => {
            services.auth.require_session()?;
            let mut post = services
                .repo
                .get_by_id(id)
                .ok_or_else(|| Error::Custom(format!("Post {id} not found")))?;
            if let Some(title) = title {
                post.title = title;
            }
            if let Some(path) = content_file {
                post.content = read_source(Some(&path))?;
                if meta.read_time.is_none() {
                    post.read_time.clear();
                }
            }
            apply_meta(&mut post, meta)?;
            let saved = services.repo.save(blog::prepare(post)?)?;
            println!("Saved post {}", saved.id);
            Ok(())
        }
        PostsCommand::Delete { id } => {
            services.auth.require_session()?;
            if !services.repo.delete(id)? {
                return Err(Error::Custom(format!("Post {id} not found")));
            }
            println!("Deleted post {id}");
            Ok(())
        }
        PostsCommand::Categories => {
            for category in services.repo.categories() {
                println!("{category}");
            }
            Ok(())
        }
    }
}

fn list(
    services: &Services,
    all: bool,
    category: Option<String>,
    tag: Option<String>,
) -> Result<()> {
    let mut posts = if all {
        services.auth.require_session()?;
        let posts = services.repo.try_list()?;
        match &category {
            Some(category) => BlogRepository::filter_by_category(posts, category),
            None => posts,
        }
    } else if let Some(category) = &category {
        services.repo.list_by_category(category)
    } else {
        services.repo.list_published()
    };
    // Tag narrows whatever the category pass left.
    if let Some(tag) = tag {
        posts = BlogRepository::filter_by_tag(posts, &tag);
    }

    if posts.is_empty() {
        println!("No posts");
        return Ok(());
    }
    for post in posts {
        let state = if post.is_draft { "draft" } else { "published" };
        println!("{}\t{}\t{}\t{}", post.id, post.date, state, post.title);
    }
    Ok(())
}

fn show(services: &Services, id: i64, raw: bool) -> Result<()> {
    let admin = services.auth.is_authenticated();
    if raw && !admin {
        services.auth.require_session()?;
    }
    let post = services
        .repo
        .get_by_id(id)
        .filter(|p| admin || p.is_published())
        .ok_or_else(|| Error::Custom(format!("Post {id} not found")))?;

    println!("# {}", post.title);
    let mut byline = vec![post.date.clone()];
    if !post.category.is_empty() {
        byline.push(post.category.clone());
    }
    byline.push(post.read_time.clone());
    if post.is_draft {
        byline.push("draft".into());
    }
    println!("{}", byline.join(" · "));
    if !post.tags.is_empty() {
        println!("tags: {}", post.tags.join(", "));
    }
    if !post.author.name.is_empty() {
        if post.author.role.is_empty() {
            println!("by {}", post.author.name);
        } else {
            println!("by {} ({})", post.author.name, post.author.role);
        }
    }
    println!();
    if raw {
        println!("{}", post.content);
    } else {
        println!("{}", sanitize(&post.content));
    }
    if !post.golden_links.is_empty() {
        println!();
        println!("Links:");
        for link in &post.golden_links {
            println!("- {}: {}", link.title, link.url);
        }
    }
    Ok(())
}

fn apply_meta(post: &mut BlogPost, meta: PostMeta) -> Result<()> {
    if let Some(excerpt) = meta.excerpt {
        post.excerpt = excerpt;
    }
    if let Some(category) = meta.category {
        post.category = category;
    }
    if let Some(cover_image) = meta.cover_image {
        post.cover_image = cover_image;
    }
    if !meta.tags.is_empty() {
        post.tags = meta.tags;
    }
    if let Some(read_time) = meta.read_time {
        post.read_time = read_time;
    }
    if let Some(name) = meta.author_name {
        post.author.name = name;
    }
    if let Some(avatar) = meta.author_avatar {
        post.author.avatar = avatar;
    }
    if let Some(role) = meta.author_role {
        post.author.role = role;
    }
    if !meta.golden_links.is_empty() {
        post.golden_links = meta
            .golden_links
            .iter()
            .map(String::as_str)
            .map(parse_golden_link)
            .collect::<Result<_>>()?;
    }
    if meta.draft {
        post.is_draft = true;
    } else if meta.publish {
        post.is_draft = false;
    }
    Ok(())
}

/// `URL|TITLE`; the title defaults to the URL.
fn parse_golden_link(raw: &str) -> Result<GoldenLink> {
    let (url, title) = match raw.split_once('|') {
        Some((url, title)) => (url.trim(), title.trim()),
        None => (raw.trim(), raw.trim()),
    };
    if url.is_empty() {
        return Err(Error::Custom(format!("Invalid golden link: {raw}")));
    }
    Ok(GoldenLink {
        url: url.to_string(),
        title: title.to_string(),
    })
}

fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => {
            debug!("reading {}", path.display());
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
