use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde_json::{json, Value};

use reelcheck_core::{Platform, VideoStatus};

/// Reelcheck: video review workflow client
///
/// Editors upload and manage videos; clients approve them or request
/// changes. Log in first, then pass the returned token via --token or the
/// REELCHECK_TOKEN environment variable.
#[derive(Parser, Debug)]
#[command(name = "reelcheck")]
#[command(about = "Video review workflow client", long_about = None)]
struct Cli {
    /// Base URL of the reelcheck server
    #[arg(long, default_value = "http://localhost:3000")]
    server: String,

    /// Session token (if not provided, will use REELCHECK_TOKEN environment variable)
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and print a session token
    Login(LoginArgs),
    /// List videos, optionally filtered by status
    List(ListArgs),
    /// Upload a new video (editors only)
    Upload(UploadArgs),
    /// Approve a video (clients only)
    Approve(VideoIdArgs),
    /// Request changes on a video with a rationale (clients only)
    RequestChanges(RequestChangesArgs),
    /// Delete a video you uploaded (editors only)
    Delete(VideoIdArgs),
    /// Add a review comment to a video
    Comment(CommentArgs),
    /// List the comments on a video, newest first
    Comments(VideoIdArgs),
    /// Show service status
    Status,
}

#[derive(Parser, Debug)]
struct LoginArgs {
    email: String,
    password: String,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Restrict to one status
    #[arg(long, value_parser = ["pending", "approved", "changes_requested"])]
    status: Option<String>,
}

#[derive(Parser, Debug)]
struct UploadArgs {
    /// Video title
    #[arg(long)]
    title: String,

    /// Client the video was produced for
    #[arg(long)]
    client_ref: String,

    /// Target platform
    #[arg(long, value_parser = ["youtube", "instagram", "tiktok", "facebook"])]
    platform: String,

    /// Durable blob-storage handle for the uploaded media
    #[arg(long)]
    file_handle: String,
}

#[derive(Parser, Debug)]
struct VideoIdArgs {
    /// Video id
    id: u64,
}

#[derive(Parser, Debug)]
struct RequestChangesArgs {
    /// Video id
    id: u64,

    /// Why the video needs changes
    rationale: String,
}

#[derive(Parser, Debug)]
struct CommentArgs {
    /// Video id
    id: u64,

    /// Comment text
    text: String,
}

struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            anyhow!("No session token provided. Use --token or set REELCHECK_TOKEN (see `reelcheck login`)")
        })
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(self.token()?)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach server at {}", self.base_url))?;
        parse_response(response).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(self.token()?)
            .send()
            .await
            .with_context(|| format!("Failed to reach server at {}", self.base_url))?;
        parse_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        let response = self
            .http
            .delete(format!("{}{}", self.base_url, path))
            .bearer_auth(self.token()?)
            .send()
            .await
            .with_context(|| format!("Failed to reach server at {}", self.base_url))?;
        parse_response(response).await
    }
}

/// Turn an HTTP response into its JSON body, surfacing the server's
/// structured error message on non-success statuses.
async fn parse_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .context("Server returned a non-JSON response")?;

    if status.is_success() {
        return Ok(body);
    }
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    let code = body.get("error").and_then(Value::as_str).unwrap_or("error");
    Err(anyhow!("{code}: {message} (HTTP {status})"))
}

async fn login(client: &ApiClient, args: LoginArgs) -> Result<()> {
    // Login is the one endpoint that takes no token.
    let response = client
        .http
        .post(format!("{}/login", client.base_url))
        .json(&json!({ "email": args.email, "password": args.password }))
        .send()
        .await
        .with_context(|| format!("Failed to reach server at {}", client.base_url))?;

    if response.status() == StatusCode::UNAUTHORIZED {
        return Err(anyhow!("Invalid credentials"));
    }
    let body = parse_response(response).await?;

    let token = body
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Server response did not contain a token"))?;
    let role = body
        .pointer("/identity/role")
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    println!("Logged in as {role}.");
    println!("export REELCHECK_TOKEN={token}");
    Ok(())
}

fn print_videos(body: &Value) {
    let Some(videos) = body.get("videos").and_then(Value::as_array) else {
        return;
    };
    if videos.is_empty() {
        println!("No videos found.");
        return;
    }
    for video in videos {
        println!(
            "#{:<4} {:<18} {:<10} {:<30} ({})",
            video.get("id").and_then(Value::as_u64).unwrap_or(0),
            video.get("status").and_then(Value::as_str).unwrap_or("?"),
            video.get("platform").and_then(Value::as_str).unwrap_or("?"),
            video.get("title").and_then(Value::as_str).unwrap_or("?"),
            video.get("client_ref").and_then(Value::as_str).unwrap_or("?"),
        );
    }
}

fn print_comments(body: &Value) {
    let Some(comments) = body.get("comments").and_then(Value::as_array) else {
        return;
    };
    if comments.is_empty() {
        println!("No comments yet.");
        return;
    }
    for comment in comments {
        println!(
            "[{}] {}: {}",
            comment.get("created_at").and_then(Value::as_str).unwrap_or("?"),
            comment
                .get("author_display_name")
                .and_then(Value::as_str)
                .unwrap_or("?"),
            comment.get("text").and_then(Value::as_str).unwrap_or(""),
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let token = cli.token.or_else(|| std::env::var("REELCHECK_TOKEN").ok());
    let client = ApiClient::new(cli.server.trim_end_matches('/').to_string(), token);

    match cli.command {
        Commands::Login(args) => login(&client, args).await?,
        Commands::List(args) => {
            // Validated by clap; parsed server-side as well.
            let path = match &args.status {
                Some(status) => {
                    status.parse::<VideoStatus>().map_err(|e| anyhow!(e))?;
                    format!("/videos?status={status}")
                }
                None => "/videos".to_string(),
            };
            let body = client.get(&path).await?;
            print_videos(&body);
        }
        Commands::Upload(args) => {
            args.platform.parse::<Platform>().map_err(|e| anyhow!(e))?;
            let body = client
                .post(
                    "/videos",
                    json!({
                        "title": args.title,
                        "client_ref": args.client_ref,
                        "platform": args.platform,
                        "file_handle": args.file_handle,
                    }),
                )
                .await?;
            let id = body.pointer("/video/id").and_then(Value::as_u64).unwrap_or(0);
            println!("Uploaded video #{id} (pending review).");
        }
        Commands::Approve(args) => {
            client
                .post(&format!("/videos/{}/approve", args.id), json!({}))
                .await?;
            println!("Video #{} approved. Editor has been notified.", args.id);
        }
        Commands::RequestChanges(args) => {
            client
                .post(
                    &format!("/videos/{}/request-changes", args.id),
                    json!({ "rationale": args.rationale }),
                )
                .await?;
            println!(
                "Change request submitted for video #{}. Editor has been notified.",
                args.id
            );
        }
        Commands::Delete(args) => {
            client.delete(&format!("/videos/{}", args.id)).await?;
            println!("Video #{} deleted.", args.id);
        }
        Commands::Comment(args) => {
            client
                .post(
                    &format!("/videos/{}/comments", args.id),
                    json!({ "text": args.text }),
                )
                .await?;
            println!("Comment added to video #{}.", args.id);
        }
        Commands::Comments(args) => {
            let body = client.get(&format!("/videos/{}/comments", args.id)).await?;
            print_comments(&body);
        }
        Commands::Status => {
            let body = client.get("/status").await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
