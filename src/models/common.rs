use crate::data::guild_gateway::GuildGateway;
use crate::usecase::command_router::CommandRouter;
use std::sync::Arc;

pub struct Data {
    pub router: CommandRouter,
    pub gateway: Arc<dyn GuildGateway>,
}
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'c> = poise::Context<'c, Data, Error>;
