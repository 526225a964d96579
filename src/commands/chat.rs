//! Interactive chat session
//!
//! Runs the terminal conversation loop: a rustyline editor with bracket-tag
//! completion, slash commands for mode/template/preset/session control,
//! prompt composition, and session persistence after every turn.

use crate::audio::AudioUpload;
use crate::chat_mode::AppMode;
use crate::commands::analyze::{analyze_file, print_analysis};
use crate::commands::presets::{find_preset, presets_table};
use crate::commands::sessions::{print_transcript, sessions_table};
use crate::commands::special::{help_text, parse_special_command, SpecialCommand};
use crate::commands::templates::{sections_table, templates_table};
use crate::config::Config;
use crate::error::{BeatsmithError, Result};
use crate::flow::{extract_flow, render_flow, render_legend};
use crate::presets::{find_conflicts, preset_request};
use crate::prompts::compose_prompt;
use crate::providers::{AssistantProvider, AudioAnalysis, GenerationOptions};
use crate::session::{ChatSession, Message, MessageRole, SessionStore};
use crate::tags::{self, MatchResult};
use crate::template::TemplateEditor;

use base64::Engine;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Rustyline helper wiring bracket-tag autosuggest into tab completion
///
/// Completion fires only while the cursor sits inside an unterminated `[`
/// tag; everywhere else the line is left alone.
pub struct TagHelper;

impl Completer for TagHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        match tags::match_input(head) {
            MatchResult::Active(query) => {
                let start = head.rfind('[').unwrap_or(0);
                let candidates = tags::suggestions(&query)
                    .into_iter()
                    .map(|tag| Pair {
                        display: tag.to_string(),
                        replacement: format!("[{}] ", tag),
                    })
                    .collect();
                Ok((start, candidates))
            }
            MatchResult::NoMatch => Ok((pos, Vec::new())),
        }
    }
}

impl Hinter for TagHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        match tags::match_input(line) {
            MatchResult::Active(query) if !query.is_empty() => {
                let first = tags::suggestions(&query).into_iter().next()?;
                // Inline hints only make sense for prefix matches
                let rest = first.to_lowercase().strip_prefix(query.as_str())?.to_string();
                Some(format!("{}]", rest))
            }
            _ => None,
        }
    }
}

impl Highlighter for TagHelper {}
impl Validator for TagHelper {}
impl Helper for TagHelper {}

/// Options carried in from the CLI for a chat session
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Start with thinking mode enabled
    pub thinking: bool,
    /// Start with search grounding enabled
    pub search: bool,
    /// Start in beef-up mode
    pub beef_up: bool,
    /// Resume a saved session by id
    pub resume: Option<String>,
}

/// Mutable state of one interactive session
struct SessionState {
    mode: AppMode,
    sample_rate: String,
    bit_depth: String,
    thinking: bool,
    search: bool,
    editor: TemplateEditor,
    analysis: Option<AudioAnalysis>,
    pending_structure: Option<String>,
    session: Option<ChatSession>,
}

impl SessionState {
    fn from_config(config: &Config, options: &ChatOptions) -> Self {
        Self {
            mode: if options.beef_up {
                AppMode::BeefUp
            } else {
                AppMode::Generator
            },
            sample_rate: config.chat.sample_rate.clone(),
            bit_depth: config.chat.bit_depth.clone(),
            thinking: options.thinking || config.chat.thinking,
            search: options.search || config.chat.search,
            editor: TemplateEditor::new(),
            analysis: None,
            pending_structure: None,
            session: None,
        }
    }

    /// Map a display index to the section id at that position
    fn section_id(&self, index: usize) -> Result<String> {
        self.editor
            .sections()
            .get(index)
            .map(|s| s.id.clone())
            .ok_or_else(|| {
                BeatsmithError::Template(format!("no section at index {}", index)).into()
            })
    }
}

/// Map provider failures to persona-voiced status lines
fn friendly_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<BeatsmithError>() {
        Some(BeatsmithError::MissingCredentials(_)) => {
            "Credentials are cooked. Set GEMINI_API_KEY or run 'beatsmith auth'.".to_string()
        }
        Some(BeatsmithError::Overloaded(_)) => {
            "The engine is overloaded right now. Give it a second and run it back.".to_string()
        }
        Some(BeatsmithError::NotFound(_)) => {
            "That model ain't there. Check the model names in your config.".to_string()
        }
        _ => format!("The engine stalled: {}", err),
    }
}

/// Run the interactive chat session
///
/// # Arguments
///
/// * `config` - Loaded application configuration
/// * `store` - Session store for persistence
/// * `provider` - Assistant backend
/// * `options` - CLI toggles and optional session to resume
///
/// # Errors
///
/// Returns error if the line editor cannot start or a resumed session id
/// is unknown; per-turn provider failures are surfaced as status lines
/// instead of ending the session.
pub async fn run_chat(
    config: &Config,
    store: &SessionStore,
    provider: &dyn AssistantProvider,
    options: ChatOptions,
) -> Result<()> {
    let mut state = SessionState::from_config(config, &options);

    if let Some(id) = &options.resume {
        let session = store
            .get(id)?
            .ok_or_else(|| BeatsmithError::NotFound(format!("No session with id {}", id)))?;
        print_transcript(&session);
        state.session = Some(session);
    }

    let mut editor = Editor::<TagHelper, DefaultHistory>::new()
        .map_err(|e| BeatsmithError::Config(format!("Failed to start line editor: {}", e)))?;
    editor.set_helper(Some(TagHelper));

    println!("{}", "BEATSMITH STUDIO".bold().cyan());
    println!(
        "{}",
        "What up doe? D-Hz in the building. Tell me what you tryna cook and I'll engineer \
         the prompt. Type /help for the controls."
            .cyan()
    );
    println!();

    loop {
        let prompt_line = format!("{} > ", state.mode.colored_tag());
        let line = match editor.readline(&prompt_line) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                return Err(BeatsmithError::Config(format!("Readline failed: {}", e)).into())
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line.as_str());

        let command = match parse_special_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.to_string().red());
                continue;
            }
        };

        match command {
            SpecialCommand::None => {
                send_prompt(&mut state, store, provider, line.trim()).await?;
            }

            SpecialCommand::SwitchMode(mode) => {
                state.mode = mode;
                println!("Switched to {} mode: {}", mode, mode.description());
            }

            SpecialCommand::SetSpecs {
                sample_rate,
                bit_depth,
            } => {
                state.sample_rate = sample_rate;
                state.bit_depth = bit_depth;
                println!(
                    "Technical specs set to {}, {}.",
                    state.sample_rate, state.bit_depth
                );
            }

            SpecialCommand::ToggleThinking(value) => {
                state.thinking = value.unwrap_or(!state.thinking);
                println!(
                    "Thinking mode {}.",
                    if state.thinking { "on" } else { "off" }
                );
            }

            SpecialCommand::ToggleSearch(value) => {
                state.search = value.unwrap_or(!state.search);
                println!(
                    "Search grounding {}.",
                    if state.search { "on" } else { "off" }
                );
            }

            SpecialCommand::ListTemplates => {
                templates_table().printstd();
            }

            SpecialCommand::LoadTemplate(id) => match state.editor.load_template(&id) {
                Ok(()) => {
                    println!("Loaded template {}.", id.cyan());
                    sections_table(state.editor.sections()).printstd();
                }
                Err(e) => println!("{}", e.to_string().red()),
            },

            SpecialCommand::MoveSection { from, to } => {
                state.editor.reorder(from, to);
                sections_table(state.editor.sections()).printstd();
            }

            SpecialCommand::AddSection(position) => {
                let id = state.editor.insert_blank();
                if let Some(position) = position {
                    let last = state.editor.sections().len() - 1;
                    state.editor.reorder(last, position);
                }
                println!("Added section {}.", id.dimmed());
                sections_table(state.editor.sections()).printstd();
            }

            SpecialCommand::RemoveSection(index) => match state.section_id(index) {
                Ok(id) => {
                    state.editor.remove(&id);
                    sections_table(state.editor.sections()).printstd();
                }
                Err(e) => println!("{}", e.to_string().red()),
            },

            SpecialCommand::SetField {
                index,
                field,
                value,
            } => {
                let result = state
                    .section_id(index)
                    .and_then(|id| state.editor.update_field(&id, field, &value));
                match result {
                    Ok(()) => sections_table(state.editor.sections()).printstd(),
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }

            SpecialCommand::InjectStructure => {
                if state.editor.is_empty() {
                    println!(
                        "{}",
                        "The editor is empty. Load a template with /template first.".yellow()
                    );
                } else {
                    let serialized = state.editor.serialize();
                    println!("Structure queued for the next prompt:\n{}", serialized.dimmed());
                    state.pending_structure = Some(serialized);
                }
            }

            SpecialCommand::ListPresets => {
                presets_table(state.mode).printstd();
            }

            SpecialCommand::UsePreset(genre) => match find_preset(state.mode, &genre) {
                Some(preset) => {
                    let request = preset_request(preset);
                    println!("{} {}", ">".dimmed(), request.dimmed());
                    send_prompt(&mut state, store, provider, &request).await?;
                }
                None => {
                    println!(
                        "{}",
                        format!("No {} preset named '{}'. Try /presets.", state.mode, genre)
                            .red()
                    );
                }
            },

            SpecialCommand::Analyze { path, description } => {
                match analyze_file(provider, &path, &description).await {
                    Ok(analysis) => {
                        print_analysis(&analysis);
                        state.analysis = Some(analysis);
                        println!(
                            "{}",
                            "Analysis loaded; it rides along with your next prompts.".dimmed()
                        );
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }

            SpecialCommand::Hear(path) => match AudioUpload::from_path(&path) {
                Ok(upload) => {
                    match provider
                        .transcribe(&upload.data_b64, &upload.mime_type)
                        .await
                    {
                        Ok(transcript) if !transcript.trim().is_empty() => {
                            let transcript = transcript.trim().to_string();
                            println!("{} {}", "heard:".dimmed(), transcript);
                            send_prompt(&mut state, store, provider, &transcript).await?;
                        }
                        Ok(_) => println!(
                            "{}",
                            "Couldn't make out anything in that recording.".yellow()
                        ),
                        Err(e) => println!("{}", friendly_error(&e).red()),
                    }
                }
                Err(e) => println!("{}", e.to_string().red()),
            },

            SpecialCommand::Speak => {
                speak_last_reply(&state, provider).await;
            }

            SpecialCommand::NewSession => {
                if let Some(session) = &state.session {
                    store.save(session)?;
                }
                state.session = None;
                state.analysis = None;
                state.pending_structure = None;
                println!("Fresh session. Run it.");
            }

            SpecialCommand::ListSessions => {
                let sessions = store.list()?;
                if sessions.is_empty() {
                    println!("No saved sessions.");
                } else {
                    sessions_table(&sessions).printstd();
                }
            }

            SpecialCommand::LoadSession(id) => match store.get(&id)? {
                Some(session) => {
                    print_transcript(&session);
                    state.session = Some(session);
                }
                None => println!("{}", format!("No session with id {}.", id).red()),
            },

            SpecialCommand::DeleteSession(id) => {
                if store.delete(&id)? {
                    println!("Deleted session {}.", id);
                } else {
                    println!("{}", format!("No session with id {}.", id).red());
                }
            }

            SpecialCommand::ReplyAt(message_id) => {
                let branched = state
                    .session
                    .as_ref()
                    .ok_or_else(|| {
                        BeatsmithError::NotFound("No active session to branch".to_string())
                    })
                    .and_then(|session| {
                        session.branch_at(&message_id).map_err(|e| {
                            BeatsmithError::NotFound(e.to_string())
                        })
                    });
                match branched {
                    Ok(branch) => {
                        store.save(&branch)?;
                        println!(
                            "Branched into session {}; replies continue from that message.",
                            branch.id.cyan()
                        );
                        state.session = Some(branch);
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }

            SpecialCommand::ShowStatus => {
                println!("Mode:      {} ({})", state.mode, state.mode.description());
                println!("Specs:     {}, {}", state.sample_rate, state.bit_depth);
                println!("Thinking:  {}", if state.thinking { "on" } else { "off" });
                println!("Search:    {}", if state.search { "on" } else { "off" });
                println!(
                    "Analysis:  {}",
                    state
                        .analysis
                        .as_ref()
                        .map(|a| a.filename.as_str())
                        .unwrap_or("none loaded")
                );
                println!("Sections:  {} in editor", state.editor.sections().len());
                println!(
                    "Session:   {}",
                    state
                        .session
                        .as_ref()
                        .map(|s| s.id.as_str())
                        .unwrap_or("not started")
                );
            }

            SpecialCommand::Help => {
                println!("{}", help_text());
            }

            SpecialCommand::Exit => break,
        }
    }

    if let Some(session) = &state.session {
        store.save(session)?;
    }
    println!("Aight, stay crisp.");
    Ok(())
}

/// Compose and send one prompt, print the reply, and persist the turn
async fn send_prompt(
    state: &mut SessionState,
    store: &SessionStore,
    provider: &dyn AssistantProvider,
    input: &str,
) -> Result<()> {
    for (anchor, conflict) in find_conflicts(input) {
        println!(
            "{}",
            format!("! '{}' fights with '{}' in the same prompt.", anchor, conflict).yellow()
        );
    }

    // A queued structure is consumed by exactly one prompt
    let raw = match state.pending_structure.take() {
        Some(structure) => format!("{}\n\nUse this exact song structure:\n{}", input, structure),
        None => input.to_string(),
    };

    let prompt = compose_prompt(
        &raw,
        &state.sample_rate,
        &state.bit_depth,
        state.analysis.as_ref(),
        state.mode,
    );

    let session = state
        .session
        .get_or_insert_with(|| ChatSession::new(input));
    let history = session.history_lines();
    session.push(Message::new(MessageRole::User, input));

    let options = GenerationOptions {
        use_thinking: state.thinking,
        use_search: state.search,
    };

    match provider.generate(&prompt, &history, options).await {
        Ok(generation) => {
            println!("\n{}", "D-Hz".cyan().bold());
            println!("{}", generation.text);
            for citation in &generation.citations {
                println!(
                    "  {} {} ({})",
                    "src:".dimmed(),
                    citation.title,
                    citation.uri.dimmed()
                );
            }
            if let Some(flow_tags) = extract_flow(&generation.text) {
                println!("\n{} {}", "flow:".dimmed(), render_flow(&flow_tags));
                for line in render_legend(&flow_tags) {
                    println!("{}", line.dimmed());
                }
            }
            println!();
            session.push(Message::assistant_with_citations(
                generation.text,
                generation.citations,
            ));
        }
        Err(e) => {
            let status = friendly_error(&e);
            println!("{}", status.red());
            session.push(Message::new(MessageRole::System, status));
        }
    }

    store.save(session)?;
    Ok(())
}

/// Synthesize the last assistant reply and write the audio to a temp file
async fn speak_last_reply(state: &SessionState, provider: &dyn AssistantProvider) {
    let Some(text) = state.session.as_ref().and_then(|session| {
        session
            .messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.clone())
    }) else {
        println!("{}", "Nothing to say yet.".yellow());
        return;
    };

    match provider.synthesize_speech(&text).await {
        Ok(Some(audio_b64)) => {
            match base64::engine::general_purpose::STANDARD.decode(&audio_b64) {
                Ok(bytes) => {
                    let path = std::env::temp_dir().join("beatsmith-reply.pcm");
                    match std::fs::write(&path, bytes) {
                        Ok(()) => println!("Audio written to {}", path.display()),
                        Err(e) => println!("{}", format!("Could not write audio: {}", e).red()),
                    }
                }
                Err(e) => println!("{}", format!("Bad audio payload: {}", e).red()),
            }
        }
        Ok(None) => println!("{}", "Speech synthesis is not available right now.".yellow()),
        Err(e) => println!("{}", friendly_error(&e).red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_at(line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        TagHelper.complete(line, pos, &ctx).unwrap()
    }

    #[test]
    fn test_completer_inside_open_tag() {
        let line = "build me a beat [ch";
        let (start, candidates) = complete_at(line, line.len());
        assert_eq!(start, 16);
        let names: Vec<&str> = candidates.iter().map(|p| p.display.as_str()).collect();
        assert!(names.contains(&"Chorus"));
        assert!(names.contains(&"Exclude: chaotic arrangement"));
        for pair in &candidates {
            assert!(pair.replacement.starts_with('['));
            assert!(pair.replacement.ends_with("] "));
        }
    }

    #[test]
    fn test_completer_outside_tag_yields_nothing() {
        let line = "no brackets here";
        let (start, candidates) = complete_at(line, line.len());
        assert_eq!(start, line.len());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_completer_closed_tag_yields_nothing() {
        let line = "already [Chorus] done";
        let (_, candidates) = complete_at(line, line.len());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_completer_empty_query_lists_everything() {
        let line = "[";
        let (start, candidates) = complete_at(line, 1);
        assert_eq!(start, 0);
        assert_eq!(candidates.len(), tags::AUTOSUGGEST_TAGS.len());
    }

    #[test]
    fn test_hinter_prefix_only() {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        // "chor" is a prefix of "Chorus" so the hint completes it
        let hint = TagHelper.hint("[chor", 5, &ctx);
        assert_eq!(hint, Some("us]".to_string()));
        // "horus" matches by containment but is not a prefix; no hint
        assert_eq!(TagHelper.hint("[horus", 6, &ctx), None);
        // No hint mid-line
        assert_eq!(TagHelper.hint("[chor and more", 5, &ctx), None);
    }

    #[test]
    fn test_friendly_error_taxonomy() {
        let err: anyhow::Error = BeatsmithError::MissingCredentials("x".to_string()).into();
        assert!(friendly_error(&err).contains("GEMINI_API_KEY"));

        let err: anyhow::Error = BeatsmithError::Overloaded("x".to_string()).into();
        assert!(friendly_error(&err).contains("overloaded"));

        let err: anyhow::Error = BeatsmithError::NotFound("x".to_string()).into();
        assert!(friendly_error(&err).contains("model"));

        let err: anyhow::Error = BeatsmithError::Provider("boom".to_string()).into();
        assert!(friendly_error(&err).contains("boom"));
    }

    #[test]
    fn test_session_state_defaults() {
        let config = Config::default();
        let state = SessionState::from_config(&config, &ChatOptions::default());
        assert_eq!(state.mode, AppMode::Generator);
        assert_eq!(state.sample_rate, "44.1kHz");
        assert!(!state.thinking);
        assert!(state.session.is_none());
    }

    #[test]
    fn test_session_state_cli_overrides() {
        let config = Config::default();
        let options = ChatOptions {
            thinking: true,
            search: true,
            beef_up: true,
            resume: None,
        };
        let state = SessionState::from_config(&config, &options);
        assert_eq!(state.mode, AppMode::BeefUp);
        assert!(state.thinking);
        assert!(state.search);
    }

    #[test]
    fn test_section_id_out_of_bounds() {
        let config = Config::default();
        let state = SessionState::from_config(&config, &ChatOptions::default());
        assert!(state.section_id(0).is_err());
    }
}
