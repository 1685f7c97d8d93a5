/// Process adapters for the external test runner
mod ansible_playbook;

pub use ansible_playbook::{
    AnsiblePlaybookAction, DEFAULT_INVENTORY, DEFAULT_PLAYBOOK, DEFAULT_PROGRAM,
};
