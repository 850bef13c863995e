use chrono::Utc;
use teloxide::{prelude::*, types::ParseMode};

use crate::{
    ConfigParameters,
    router::{IgnoreReason, Inbound, Outcome},
};

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let inbound = Inbound {
        chat_id: msg.chat.id.0,
        username: msg.from.as_ref().and_then(|user| user.username.as_deref()),
        text,
    };

    match cfg.router.dispatch(inbound, Utc::now()).await {
        Outcome::Reply(reply) => {
            bot.send_message(msg.chat.id, reply)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Outcome::Ignored(IgnoreReason::NotAllowed) => {}
        Outcome::Ignored(IgnoreReason::Unmatched) => {
            tracing::trace!("ignored message {} in chat {}", msg.id.0, msg.chat.id.0);
        }
    }

    Ok(())
}
