use serde::Serialize;

use crate::domain::user::{Bio, Image, RegisteredUser, Username};

/// Public profile of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    username: Username,
    bio: Bio,
    image: Image,
    following: bool,
}

impl Profile {
    pub fn new(username: Username, bio: Bio, image: Image, following: bool) -> Self {
        Self {
            username,
            bio,
            image,
            following,
        }
    }

    /// Profile of `user` as seen by someone with the given follow state
    pub fn of(user: &RegisteredUser, following: bool) -> Self {
        Self::new(
            user.username().clone(),
            user.bio().clone(),
            user.image().clone(),
            following,
        )
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn bio(&self) -> &Bio {
        &self.bio
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn following(&self) -> bool {
        self.following
    }
}
