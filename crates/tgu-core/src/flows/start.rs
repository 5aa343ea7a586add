use crate::{domain::MessageRef, messaging::port::MessagingPort, Result};

pub const WELCOME_HTML: &str = "Hello <b>Dear!</b>\n\n\
👋 <b>Welcome to the Telegra.ph Uploader Bot!</b>\n\n\
With this bot, you can:\n\
 • <b>Upload Photos</b>: Send me a photo, and I'll upload it to Telegra.ph, \
providing you with a link.\n\
 • <b>Create Instant View Links</b>: Send me a text, and I'll create an instant view \
link for it.\n\n\
📌 <b>Usage</b>:\n\
• Send a photo directly to upload it.\n\
• Send a text message in the format mentioned below to create a Telegra.ph post.\n\n\
🔗 <b>About Telegra.ph</b>:\n\
Telegra.ph is a minimalist publishing tool that allows you to create richly formatted posts \
with photos, videos, and all sorts of embedded content.\n\n\
🌟 <b>Get Started</b>: Just send a photo or text message, and let me do the rest!\n\n\
🛠 <b>Source Code</b>: \
<a href=\"https://github.com/Ns-AnoNymouS/Telegraph-Uploader\">Fork on GitHub</a>\n\n\
📝 <b>Custom Title</b>:\n\
<pre>Title: {title}\n{content}</pre>\n\n\
📝 <b>Example</b>:\n\
<pre>Title: My First Telegraph Post\n\
This is the content of my first Telegraph post!\n\
I'm using the Telegra.ph Uploader Bot to publish this.\n\n\
Here's a list of what I like:\n\
- Programming 💻\n\
- Reading 📚\n\
- Traveling ✈️\n\
- Music 🎵\n\n\
You can create your own posts too. Just follow the format and enjoy!</pre>";

/// Answer `/start` and `/help` with the fixed welcome text.
pub async fn send_welcome(messenger: &dyn MessagingPort, origin: MessageRef) -> Result<()> {
    messenger.reply_html(origin, WELCOME_HTML).await?;
    Ok(())
}
