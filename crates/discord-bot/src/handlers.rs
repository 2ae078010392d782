use std::sync::Arc;

use serenity::{
    async_trait,
    model::{
        application::{
            command::Command,
            interaction::{
                application_command::{ApplicationCommandInteraction, CommandDataOption},
                autocomplete::AutocompleteInteraction,
                message_component::MessageComponentInteraction,
                Interaction, InteractionResponseType,
            },
        },
        gateway::Ready,
        guild::{Guild, Member},
        id::GuildId,
        user::User,
    },
    prelude::*,
};
use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_core::models::ChannelId;
use teamsync_core::ports::Actor;
use teamsync_engine::{admin, SchedulingEngine, SyncContext};
use tracing::{debug, error, info, warn};

pub mod event;
pub mod rsvp;
pub mod setup;
pub mod team;

use crate::config::BotConfig;
use crate::options;

/// Everything a command needs, shared by all interactions.
#[derive(Clone)]
pub struct BotState {
    pub config: BotConfig,
    pub sync: Arc<SyncContext>,
    pub engine: Arc<SchedulingEngine>,
}

/// A slash command reduced to the data the engine works with.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub name: String,
    pub community_id: String,
    pub channel_id: ChannelId,
    pub actor: Actor,
    pub options: Vec<CommandDataOption>,
}

impl Invocation {
    /// `None` for commands used outside a server.
    pub fn from_command(command: &ApplicationCommandInteraction) -> Option<Self> {
        let guild_id = command.guild_id?;
        Some(Self {
            name: command.data.name.clone(),
            community_id: guild_id.0.to_string(),
            channel_id: command.channel_id.0,
            actor: actor_for(&command.user, command.member.as_ref()),
            options: command.data.options.clone(),
        })
    }
}

/// Build the actor from the interaction's member data.
pub fn actor_for(user: &User, member: Option<&Member>) -> Actor {
    Actor {
        user_id: user.id.0,
        display_name: member
            .and_then(|m| m.nick.clone())
            .unwrap_or_else(|| user.name.clone()),
        role_ids: member
            .map(|m| m.roles.iter().map(|r| r.0).collect())
            .unwrap_or_default(),
        server_admin: member
            .and_then(|m| m.permissions)
            .is_some_and(|p| p.administrator()),
    }
}

/// Text shown to the user when a command fails.
pub fn user_message(err: &SyncError) -> String {
    match err {
        SyncError::UnauthorizedActor(_) => "You do not have permission.".to_string(),
        SyncError::SetupIncomplete(_) => {
            "Bot not setup yet. A server administrator needs to run /setup.".to_string()
        }
        SyncError::AlreadySetUp(_) => {
            "Setup has already been completed for this server. Use other commands to modify settings."
                .to_string()
        }
        SyncError::ChannelUnavailable(_) => {
            "Team schedule channel not found. Please notify a server admin to check.".to_string()
        }
        SyncError::Timeout(_) | SyncError::Persistence(_) | SyncError::PersistenceWriteFailure(_) => {
            "Something went wrong on our side, please try again later.".to_string()
        }
        other => other.to_string(),
    }
}

/// Route a slash command to its handler and produce the reply text.
pub async fn dispatch_command(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    match invocation.name.as_str() {
        "setup" => setup::handle_setup(state, invocation).await,
        "addbotchannel" | "removebotchannel" | "listbotchannels" => {
            setup::handle_bot_channels(state, invocation).await
        }
        "addadminrole" | "removeadminrole" | "listadminroles" => {
            setup::handle_admin_roles(state, invocation).await
        }
        "setlogchannel" => setup::handle_log_channel(state, invocation).await,
        "create_team" => team::handle_create_team(state, invocation).await,
        "list_teams" => team::handle_list_teams(state, invocation).await,
        "delete_team" => team::handle_delete_team(state, invocation).await,
        "modify_team" => team::handle_modify_team(state, invocation).await,
        "event" => event::handle_event(state, invocation).await,
        "sync_now" => event::handle_sync_now(state, invocation).await,
        "update" => event::handle_update(state, invocation).await,
        "help" => Ok(event::help_text()),
        "version" => Ok(format!("Bot version: {}", env!("CARGO_PKG_VERSION"))),
        other => Err(SyncError::NotFound(format!("command /{other}"))),
    }
}

/// Choices for the option being typed into during autocomplete.
pub async fn autocomplete_choices(
    state: &BotState,
    community_id: &str,
    command: &str,
    given: &[CommandDataOption],
) -> SyncResult<Vec<String>> {
    let Some((option, text)) = options::focused(given) else {
        return Ok(Vec::new());
    };

    match (command, option) {
        ("create_team", "timezone") => Ok(timezone_choices(&text)),
        ("event", "team_name") | ("delete_team", "team") | ("modify_team", "team") => {
            admin::team_names_matching(&state.sync, community_id, &text).await
        }
        ("modify_team", "value") => {
            let field = options::optional_string(given, "field");
            if field.as_deref() == Some("timezone") {
                Ok(timezone_choices(&text))
            } else {
                Ok(Vec::new())
            }
        }
        _ => Ok(Vec::new()),
    }
}

fn timezone_choices(text: &str) -> Vec<String> {
    teamsync_core::timezone::suggest(text)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Main Discord handler that processes all events.
pub struct Handler {
    state: BotState,
}

impl Handler {
    pub fn new(state: BotState) -> Self {
        Self { state }
    }

    async fn register(&self, ctx: &Context) {
        // For dev testing, register for specific guilds to avoid global command cache delay
        if let Some(test_guild_id) = self.state.config.test_guild_id {
            match GuildId(test_guild_id)
                .set_application_commands(&ctx.http, crate::commands::register_commands)
                .await
            {
                Ok(cmds) => info!(
                    "Guild commands registered for {}: {}",
                    test_guild_id,
                    cmds.len()
                ),
                Err(why) => error!("Error registering guild commands: {:?}", why),
            }
        }

        match Command::set_global_application_commands(&ctx.http, crate::commands::register_commands)
            .await
        {
            Ok(cmds) => {
                info!("Global commands registered successfully! Total commands: {}", cmds.len());
                for cmd in cmds {
                    debug!("Command registered: /{} - {}", cmd.name, cmd.description);
                }
            }
            Err(why) => error!("Error registering global commands: {:?}", why),
        }
    }

    async fn on_command(&self, ctx: &Context, command: ApplicationCommandInteraction) {
        info!("Received command: {}", command.data.name);

        // Acknowledge within Discord's three-second limit, then reply once the work is done.
        if let Err(why) = command
            .create_interaction_response(&ctx.http, |r| {
                r.kind(InteractionResponseType::DeferredChannelMessageWithSource)
                    .interaction_response_data(|m| m.ephemeral(true))
            })
            .await
        {
            error!("Failed to acknowledge command: {:?}", why);
            return;
        }

        let reply = match Invocation::from_command(&command) {
            Some(invocation) => match dispatch_command(&self.state, &invocation).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Command /{} failed: {}", invocation.name, e);
                    user_message(&e)
                }
            },
            None => "This command can only be used in a server.".to_string(),
        };

        if let Err(why) = command
            .edit_original_interaction_response(&ctx.http, |r| r.content(reply))
            .await
        {
            error!("Failed to send command response: {:?}", why);
        }
    }

    async fn on_component(&self, ctx: &Context, component: MessageComponentInteraction) {
        let Some(request) = rsvp::request_from(&component) else {
            debug!("Ignoring component {}", component.data.custom_id);
            return;
        };

        if let Err(why) = component
            .create_interaction_response(&ctx.http, |r| {
                r.kind(InteractionResponseType::DeferredChannelMessageWithSource)
                    .interaction_response_data(|m| m.ephemeral(true))
            })
            .await
        {
            error!("Failed to acknowledge RSVP: {:?}", why);
            return;
        }

        let reply = match teamsync_engine::intake::handle_rsvp(&self.state.sync, request).await {
            Ok(outcome) => outcome.reply(),
            Err(e) => {
                error!("Error handling RSVP: {}", e);
                user_message(&e)
            }
        };

        if let Err(why) = component
            .edit_original_interaction_response(&ctx.http, |r| r.content(reply))
            .await
        {
            error!("Failed to send RSVP response: {:?}", why);
        }
    }

    async fn on_autocomplete(&self, ctx: &Context, autocomplete: AutocompleteInteraction) {
        let Some(guild_id) = autocomplete.guild_id else {
            return;
        };
        let choices = autocomplete_choices(
            &self.state,
            &guild_id.0.to_string(),
            &autocomplete.data.name,
            &autocomplete.data.options,
        )
        .await
        .unwrap_or_else(|e| {
            warn!("Autocomplete for /{} failed: {}", autocomplete.data.name, e);
            Vec::new()
        });

        if let Err(why) = autocomplete
            .create_autocomplete_response(&ctx.http, |r| {
                for choice in &choices {
                    r.add_string_choice(choice, choice);
                }
                r
            })
            .await
        {
            error!("Failed to send autocomplete choices: {:?}", why);
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Handle ready events (when bot connects to Discord)
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
        self.register(&ctx).await;
    }

    /// A guild became available; unknown ones get an empty configuration.
    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: bool) {
        let community_id = guild.id.0.to_string();
        match admin::register_community(&self.state.sync, &community_id).await {
            Ok(true) => info!("Registered new community {} ({})", guild.name, community_id),
            Ok(false) => debug!("Community {} already known", community_id),
            Err(e) => error!("Failed to register community {}: {}", community_id, e),
        }
    }

    /// Handle interactions (slash commands, buttons, autocomplete)
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => self.on_command(&ctx, command).await,
            Interaction::MessageComponent(component) => self.on_component(&ctx, component).await,
            Interaction::Autocomplete(autocomplete) => {
                self.on_autocomplete(&ctx, autocomplete).await
            }
            _ => {}
        }
    }
}
