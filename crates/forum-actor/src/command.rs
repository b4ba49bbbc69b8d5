use tokio::sync::oneshot;
use tracing::trace;
use uuid::Uuid;

use forum_engine::{Engine, EngineError};
use forum_types::models::{
    Comment, DirectMessage, Post, StatsSnapshot, Subreddit, User, UserSummary,
};

pub(crate) type Reply<T> = oneshot::Sender<Result<T, EngineError>>;

/// One engine call queued in the mailbox, with the channel its answer
/// goes back on.
pub(crate) enum Command {
    RegisterUser {
        username: String,
        password: String,
        reply: Reply<User>,
    },
    GetUser {
        username: String,
        reply: Reply<User>,
    },
    ListUsers {
        reply: oneshot::Sender<Vec<UserSummary>>,
    },
    CreateSubreddit {
        name: String,
        description: String,
        creator: String,
        reply: Reply<Subreddit>,
    },
    GetSubreddit {
        name: String,
        reply: Reply<Subreddit>,
    },
    JoinSubreddit {
        username: String,
        subreddit: String,
        reply: Reply<()>,
    },
    LeaveSubreddit {
        username: String,
        subreddit: String,
        reply: Reply<()>,
    },
    CreatePost {
        title: String,
        content: String,
        author: String,
        subreddit: String,
        reply: Reply<Post>,
    },
    GetPost {
        post_id: Uuid,
        reply: Reply<Post>,
    },
    VotePost {
        post_id: Uuid,
        upvote: bool,
        reply: Reply<Post>,
    },
    AddComment {
        content: String,
        author: String,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        reply: Reply<Comment>,
    },
    GetComments {
        post_id: Uuid,
        reply: Reply<Vec<Comment>>,
    },
    GetFeed {
        username: String,
        reply: Reply<Vec<Post>>,
    },
    SendDirectMessage {
        from: String,
        to: String,
        content: String,
        reply: Reply<DirectMessage>,
    },
    ReplyToDirectMessage {
        original_id: Uuid,
        from: String,
        content: String,
        reply: Reply<DirectMessage>,
    },
    GetDirectMessages {
        username: String,
        reply: Reply<Vec<DirectMessage>>,
    },
    GetStats {
        top_n: usize,
        reply: oneshot::Sender<StatsSnapshot>,
    },
    Shutdown,
}

impl Command {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::RegisterUser { .. } => "register_user",
            Self::GetUser { .. } => "get_user",
            Self::ListUsers { .. } => "list_users",
            Self::CreateSubreddit { .. } => "create_subreddit",
            Self::GetSubreddit { .. } => "get_subreddit",
            Self::JoinSubreddit { .. } => "join_subreddit",
            Self::LeaveSubreddit { .. } => "leave_subreddit",
            Self::CreatePost { .. } => "create_post",
            Self::GetPost { .. } => "get_post",
            Self::VotePost { .. } => "vote_post",
            Self::AddComment { .. } => "add_comment",
            Self::GetComments { .. } => "get_comments",
            Self::GetFeed { .. } => "get_feed",
            Self::SendDirectMessage { .. } => "send_direct_message",
            Self::ReplyToDirectMessage { .. } => "reply_to_direct_message",
            Self::GetDirectMessages { .. } => "get_direct_messages",
            Self::GetStats { .. } => "get_stats",
            Self::Shutdown => "shutdown",
        }
    }

    /// Runs the call and answers it. A caller that stopped waiting is not an
    /// error; its answer is dropped.
    pub(crate) fn execute(self, engine: &Engine) {
        match self {
            Self::RegisterUser { username, password, reply } => {
                let _ = reply.send(engine.register_user(&username, &password));
            }
            Self::GetUser { username, reply } => {
                let _ = reply.send(engine.get_user(&username));
            }
            Self::ListUsers { reply } => {
                let _ = reply.send(engine.list_users());
            }
            Self::CreateSubreddit { name, description, creator, reply } => {
                let _ = reply.send(engine.create_subreddit(&name, &description, &creator));
            }
            Self::GetSubreddit { name, reply } => {
                let _ = reply.send(engine.get_subreddit(&name));
            }
            Self::JoinSubreddit { username, subreddit, reply } => {
                let _ = reply.send(engine.join_subreddit(&username, &subreddit));
            }
            Self::LeaveSubreddit { username, subreddit, reply } => {
                let _ = reply.send(engine.leave_subreddit(&username, &subreddit));
            }
            Self::CreatePost { title, content, author, subreddit, reply } => {
                let _ = reply.send(engine.create_post(&title, &content, &author, &subreddit));
            }
            Self::GetPost { post_id, reply } => {
                let _ = reply.send(engine.get_post(post_id));
            }
            Self::VotePost { post_id, upvote, reply } => {
                let _ = reply.send(engine.vote_post(post_id, upvote));
            }
            Self::AddComment { content, author, post_id, parent_id, reply } => {
                let _ = reply.send(engine.add_comment(&content, &author, post_id, parent_id));
            }
            Self::GetComments { post_id, reply } => {
                let result = engine.get_comments(post_id);
                if let Ok(comments) = &result {
                    trace_comment_tree(comments, 0);
                }
                let _ = reply.send(result);
            }
            Self::GetFeed { username, reply } => {
                let _ = reply.send(engine.get_user_feed(&username));
            }
            Self::SendDirectMessage { from, to, content, reply } => {
                let _ = reply.send(engine.send_direct_message(&from, &to, &content));
            }
            Self::ReplyToDirectMessage { original_id, from, content, reply } => {
                let _ = reply.send(engine.reply_to_direct_message(original_id, &from, &content));
            }
            Self::GetDirectMessages { username, reply } => {
                let _ = reply.send(engine.get_direct_messages(&username));
            }
            Self::GetStats { top_n, reply } => {
                let _ = reply.send(engine.stats(top_n));
            }
            Self::Shutdown => {}
        }
    }
}

fn trace_comment_tree(comments: &[Comment], depth: usize) {
    for comment in comments {
        trace!("{}- {} (by {})", "  ".repeat(depth), comment.content, comment.author);
        trace_comment_tree(&comment.children, depth + 1);
    }
}
