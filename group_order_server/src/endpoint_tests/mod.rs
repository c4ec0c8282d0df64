mod helpers;
mod lobbies;
