//! Self-contained chat widget generation.
//!
//! The snippet is three parts: a container `<div>`, a `<style>` block whose
//! only accent color is `primaryColor`, and an inline script that runs its
//! own transcript against the completion endpoint. No external assets.

use tracing::warn;

use chatforge_types::chatbot::{ChatbotConfig, DEFAULT_PRIMARY_COLOR, Tone, is_valid_hex_color};
use chatforge_types::llm::CompletionSettings;

use crate::chat::prompt::{
    BREVITY_CLAUSE, DEFAULT_CHATBOT_NAME, DEFAULT_DIRECTIVE_COMPANY, EMOJI_CLAUSE,
    build_welcome_message,
};

/// Element id the widget mounts into.
pub const CONTAINER_ID: &str = "custom-chatbot";

/// Encode `value` as a JavaScript string literal safe inside `<script>`.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}

fn accent_color(config: &ChatbotConfig) -> &str {
    if is_valid_hex_color(&config.primary_color) {
        &config.primary_color
    } else {
        warn!(
            color = %config.primary_color,
            fallback = DEFAULT_PRIMARY_COLOR,
            "Invalid primary color, using default accent"
        );
        DEFAULT_PRIMARY_COLOR
    }
}

/// Generate the embed snippet with the default completion settings.
pub fn generate_embed(config: &ChatbotConfig, welcome_message: &str) -> String {
    generate_embed_with(&CompletionSettings::default(), config, welcome_message)
}

/// Generate the embed snippet for `config`, greeting with its own welcome message.
pub fn generate_embed_for(settings: &CompletionSettings, config: &ChatbotConfig) -> String {
    generate_embed_with(settings, config, &build_welcome_message(config))
}

/// Generate the embed snippet for `config`.
///
/// The output is a pure function of its inputs. The credential is written
/// into the script in plaintext.
pub fn generate_embed_with(
    settings: &CompletionSettings,
    config: &ChatbotConfig,
    welcome_message: &str,
) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str("<!-- Chatforge Chatbot Embed Code -->\n");
    out.push_str(&format!("<div id=\"{CONTAINER_ID}\"></div>\n"));
    out.push_str(&render_style(accent_color(config)));
    out.push_str("<script>\n(function () {\n");
    out.push_str(&render_config_block(settings, config, welcome_message));
    out.push_str(&render_prompt_builder());
    out.push_str(WIDGET_SCRIPT);
    out.push_str("})();\n</script>\n");
    out
}

fn render_style(accent: &str) -> String {
    format!(
        r#"<style>
  #custom-chatbot {{
    position: fixed;
    bottom: 20px;
    right: 20px;
    z-index: 2147483000;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
  }}
  #custom-chatbot .cf-toggle {{
    width: 60px;
    height: 60px;
    border: none;
    border-radius: 50%;
    background: {accent};
    color: #ffffff;
    font-size: 26px;
    cursor: pointer;
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.2);
  }}
  #custom-chatbot .cf-window {{
    width: 350px;
    height: 500px;
    display: flex;
    flex-direction: column;
    background: #ffffff;
    border-radius: 12px;
    overflow: hidden;
    box-shadow: 0 8px 24px rgba(0, 0, 0, 0.2);
  }}
  #custom-chatbot .cf-window[hidden] {{
    display: none;
  }}
  #custom-chatbot .cf-header {{
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 14px 16px;
    background: {accent};
    color: #ffffff;
    font-weight: 600;
  }}
  #custom-chatbot .cf-close {{
    border: none;
    background: transparent;
    color: #ffffff;
    font-size: 20px;
    cursor: pointer;
  }}
  #custom-chatbot .cf-messages {{
    flex: 1;
    overflow-y: auto;
    padding: 12px;
    background: #f8f9fa;
  }}
  #custom-chatbot .cf-msg {{
    max-width: 80%;
    margin: 6px 0;
    padding: 8px 12px;
    border-radius: 12px;
    line-height: 1.4;
    word-wrap: break-word;
  }}
  #custom-chatbot .cf-user {{
    margin-left: auto;
    background: {accent};
    color: #ffffff;
  }}
  #custom-chatbot .cf-bot {{
    margin-right: auto;
    background: #e9ecef;
    color: #212529;
  }}
  #custom-chatbot .cf-typing {{
    font-style: italic;
    color: #6c757d;
  }}
  #custom-chatbot .cf-form {{
    display: flex;
    gap: 8px;
    padding: 12px;
    border-top: 1px solid #dee2e6;
  }}
  #custom-chatbot .cf-input {{
    flex: 1;
    padding: 8px 12px;
    border: 1px solid #ced4da;
    border-radius: 8px;
    outline: none;
  }}
  #custom-chatbot .cf-input:focus {{
    border-color: {accent};
  }}
  #custom-chatbot .cf-send {{
    padding: 8px 16px;
    border: none;
    border-radius: 8px;
    background: {accent};
    color: #ffffff;
    cursor: pointer;
  }}
  #custom-chatbot .cf-send:disabled {{
    opacity: 0.6;
    cursor: not-allowed;
  }}
</style>
"#
    )
}

fn render_config_block(
    settings: &CompletionSettings,
    config: &ChatbotConfig,
    welcome_message: &str,
) -> String {
    format!(
        r#"  var CONFIG = {{
    endpoint: {endpoint},
    model: {model},
    maxTokens: {max_tokens},
    temperature: {temperature},
    apiKey: {api_key},
    companyName: {company_name},
    chatbotName: {chatbot_name},
    purpose: {purpose},
    tone: {tone},
    welcomeMessage: {welcome}
  }};
"#,
        endpoint = js_string(&settings.endpoint),
        model = js_string(&settings.model),
        max_tokens = settings.max_tokens,
        temperature = settings.effective_temperature(),
        api_key = js_string(&config.api_key),
        company_name = js_string(&config.company_name),
        chatbot_name = js_string(&config.chatbot_name),
        purpose = js_string(&config.purpose.to_string()),
        tone = js_string(&config.tone.to_string()),
        welcome = js_string(welcome_message),
    )
}

/// JS twin of [`build_embed_directive`], built from the same clauses and defaults.
fn render_prompt_builder() -> String {
    format!(
        r#"
  function buildSystemPrompt() {{
    var prompt = 'You are a ' + CONFIG.purpose + ' chatbot named "' +
      (CONFIG.chatbotName || {default_name}) + '" for ' +
      (CONFIG.companyName || {default_company}) + '. Tone: ' + CONFIG.tone +
      '. ' + {brevity};
    if (CONFIG.tone === {friendly}) {{
      prompt += {emoji};
    }}
    return prompt;
  }}
"#,
        default_name = js_string(DEFAULT_CHATBOT_NAME),
        default_company = js_string(DEFAULT_DIRECTIVE_COMPANY),
        brevity = js_string(BREVITY_CLAUSE),
        friendly = js_string(&Tone::Friendly.to_string()),
        emoji = js_string(EMOJI_CLAUSE),
    )
}

// Follows the conversation rules of the preview: user entry first, reply
// appended only after the call, one call at a time.
const WIDGET_SCRIPT: &str = r#"
  var root = document.getElementById('custom-chatbot');
  if (!root) {
    return;
  }

  var history = [{ sender: 'bot', text: CONFIG.welcomeMessage }];
  var isLoading = false;

  var toggle = document.createElement('button');
  toggle.className = 'cf-toggle';
  toggle.type = 'button';
  toggle.setAttribute('aria-label', 'Open chat');
  toggle.textContent = '💬';

  var panel = document.createElement('div');
  panel.className = 'cf-window';
  panel.hidden = true;

  var header = document.createElement('div');
  header.className = 'cf-header';
  var title = document.createElement('span');
  title.textContent = CONFIG.chatbotName || 'Assistant';
  var close = document.createElement('button');
  close.className = 'cf-close';
  close.type = 'button';
  close.setAttribute('aria-label', 'Close chat');
  close.textContent = '×';
  header.appendChild(title);
  header.appendChild(close);

  var messages = document.createElement('div');
  messages.className = 'cf-messages';

  var form = document.createElement('form');
  form.className = 'cf-form';
  var input = document.createElement('input');
  input.className = 'cf-input';
  input.type = 'text';
  input.placeholder = 'Type your message...';
  var send = document.createElement('button');
  send.className = 'cf-send';
  send.type = 'submit';
  send.textContent = 'Send';
  form.appendChild(input);
  form.appendChild(send);

  panel.appendChild(header);
  panel.appendChild(messages);
  panel.appendChild(form);
  root.appendChild(panel);
  root.appendChild(toggle);

  function render() {
    messages.textContent = '';
    history.forEach(function (entry) {
      var bubble = document.createElement('div');
      bubble.className = 'cf-msg ' + (entry.sender === 'user' ? 'cf-user' : 'cf-bot');
      bubble.textContent = entry.text;
      messages.appendChild(bubble);
    });
    if (isLoading) {
      var typing = document.createElement('div');
      typing.className = 'cf-msg cf-bot cf-typing';
      typing.textContent = '...';
      messages.appendChild(typing);
    }
    messages.scrollTop = messages.scrollHeight;
    send.disabled = isLoading;
  }

  function setOpen(open) {
    panel.hidden = !open;
    toggle.hidden = open;
    if (open) {
      input.focus();
    }
  }

  toggle.addEventListener('click', function () { setOpen(true); });
  close.addEventListener('click', function () { setOpen(false); });

  function sendMessage(text) {
    if (!text.trim() || isLoading) {
      return;
    }
    var payloadMessages = [{ role: 'system', content: buildSystemPrompt() }]
      .concat(history.map(function (entry) {
        return { role: entry.sender === 'user' ? 'user' : 'assistant', content: entry.text };
      }))
      .concat([{ role: 'user', content: text }]);

    history.push({ sender: 'user', text: text });
    if (!CONFIG.apiKey.trim()) {
      history.push({ sender: 'bot', text: '❌ Add your Groq API key first!' });
      render();
      return;
    }

    isLoading = true;
    render();

    fetch(CONFIG.endpoint, {
      method: 'POST',
      headers: {
        'Authorization': 'Bearer ' + CONFIG.apiKey,
        'Content-Type': 'application/json'
      },
      body: JSON.stringify({
        model: CONFIG.model,
        messages: payloadMessages,
        max_tokens: CONFIG.maxTokens,
        temperature: CONFIG.temperature
      })
    })
      .then(function (response) {
        if (!response.ok) {
          return response.text().then(function (body) {
            throw new Error('API ' + response.status + ': ' + body.slice(0, 100));
          });
        }
        return response.json();
      })
      .then(function (data) {
        history.push({ sender: 'bot', text: data.choices[0].message.content });
      })
      .catch(function (err) {
        history.push({ sender: 'bot', text: '⚠️ Error: ' + err.message });
      })
      .then(function () {
        isLoading = false;
        render();
      });
  }

  form.addEventListener('submit', function (event) {
    event.preventDefault();
    var text = input.value;
    input.value = '';
    sendMessage(text);
  });

  render();
"#;
