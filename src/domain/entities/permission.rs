use std::collections::HashSet;
use std::fmt;

/// Channel permissions a command can require from its caller or from the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Administrator,
    ViewChannel,
    SendMessages,
    EmbedLinks,
    AttachFiles,
    AddReactions,
    ReadMessageHistory,
    MentionEveryone,
    ManageMessages,
    ManageChannels,
    ManageRoles,
    ManageNicknames,
    ManageGuild,
    KickMembers,
    BanMembers,
    ModerateMembers,
}

impl Permission {
    pub const ALL: [Permission; 16] = [
        Permission::Administrator,
        Permission::ViewChannel,
        Permission::SendMessages,
        Permission::EmbedLinks,
        Permission::AttachFiles,
        Permission::AddReactions,
        Permission::ReadMessageHistory,
        Permission::MentionEveryone,
        Permission::ManageMessages,
        Permission::ManageChannels,
        Permission::ManageRoles,
        Permission::ManageNicknames,
        Permission::ManageGuild,
        Permission::KickMembers,
        Permission::BanMembers,
        Permission::ModerateMembers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Administrator => "administrator",
            Permission::ViewChannel => "view_channel",
            Permission::SendMessages => "send_messages",
            Permission::EmbedLinks => "embed_links",
            Permission::AttachFiles => "attach_files",
            Permission::AddReactions => "add_reactions",
            Permission::ReadMessageHistory => "read_message_history",
            Permission::MentionEveryone => "mention_everyone",
            Permission::ManageMessages => "manage_messages",
            Permission::ManageChannels => "manage_channels",
            Permission::ManageRoles => "manage_roles",
            Permission::ManageNicknames => "manage_nicknames",
            Permission::ManageGuild => "manage_guild",
            Permission::KickMembers => "kick_members",
            Permission::BanMembers => "ban_members",
            Permission::ModerateMembers => "moderate_members",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective permissions of one user in one channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    granted: HashSet<Permission>,
}

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Permission::ALL.into_iter().collect()
    }

    /// What anyone has inside a private channel
    pub fn direct_message() -> Self {
        [
            Permission::ViewChannel,
            Permission::SendMessages,
            Permission::EmbedLinks,
            Permission::AttachFiles,
            Permission::AddReactions,
            Permission::ReadMessageHistory,
            Permission::MentionEveryone,
        ]
        .into_iter()
        .collect()
    }

    pub fn insert(&mut self, permission: Permission) {
        self.granted.insert(permission);
    }

    pub fn with(mut self, permission: Permission) -> Self {
        self.insert(permission);
        self
    }

    /// Administrators implicitly hold every permission
    pub fn contains(&self, permission: Permission) -> bool {
        self.granted.contains(&Permission::Administrator) || self.granted.contains(&permission)
    }

    /// The subset of `required` that is not granted, in the order given
    pub fn missing(&self, required: &[Permission]) -> Vec<Permission> {
        required
            .iter()
            .copied()
            .filter(|p| !self.contains(*p))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}
