use std::path::Path;

use opencred::error::AppError;
use opencred::lending::assistant::{ApplicationSession, ChatbotConversation, ChatbotTurn};
use tracing::info;

use super::{is_exit, prompt_lines};
use crate::cli::{AssistantArgs, Context};
use crate::render;

pub(crate) async fn run(context: &Context, args: AssistantArgs) -> Result<(), AppError> {
    let mut conversation = ChatbotConversation::new(context.config.session.ttl);
    for message in conversation.messages() {
        render::print_chat_line(message);
    }
    println!("(type 'exit' to leave)");

    let mut lines = prompt_lines();
    while let Some(line) = lines.next_line().await? {
        if is_exit(&line) {
            break;
        }

        match conversation.send(context.backend.as_ref(), &line).await {
            ChatbotTurn::Ignored => continue,
            ChatbotTurn::Replied { reply, .. } | ChatbotTurn::Unavailable { reply } => {
                println!("Assistant: {reply}");
            }
            ChatbotTurn::HandOff { reply, session } => {
                println!("Assistant: {reply}");
                save_session(&args.session_out, &session).await?;
                println!(
                    "\nYour details are saved to {}. Finish with `opencred apply --session {} --pan-doc <file> --aadhaar-doc <file>` before {}.",
                    args.session_out.display(),
                    args.session_out.display(),
                    session.expires_at().format("%H:%M UTC"),
                );
                return Ok(());
            }
        }
    }

    let missing = conversation.missing_fields();
    if !missing.is_empty() {
        println!(
            "Conversation ended before the application was complete. Still needed: {}",
            missing.join(", ")
        );
    }
    Ok(())
}

async fn save_session(path: &Path, session: &ApplicationSession) -> Result<(), AppError> {
    tokio::fs::write(path, serde_json::to_vec_pretty(session)?).await?;
    info!(path = %path.display(), "assistant session saved");
    Ok(())
}
