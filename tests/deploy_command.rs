//! Playbook command assembly and EL-version gating. Pure functions only; no
//! ansible or docker is executed here.

use std::path::Path;

use iocdeploy::deploy::{playbook_command, supported_el_versions, DeployOptions};

fn base_options() -> DeployOptions {
    DeployOptions::new("testhost")
}

#[test]
fn local_command_shape() {
    let opts = base_options();
    let cmd = playbook_command(&opts, "tst-motor-ioc1", Path::new("configs/motor.yml"));

    assert_eq!(
        cmd,
        vec![
            "ansible-playbook",
            "--diff",
            "-u",
            "root",
            "--limit",
            "testhost",
            "-e",
            "deploy_ioc_target=tst-motor-ioc1",
            "-e",
            "deploy_ioc_local_config_path=configs/motor.yml",
            "-e",
            "deploy_ioc_nsls2network_available=false",
            "scripts/deploy_local_ioc_config.yml",
        ]
    );
}

#[test]
fn container_command_adds_docker_inventory() {
    let mut opts = base_options();
    opts.container = true;
    let cmd = playbook_command(&opts, "tst-motor-ioc1", Path::new("configs/motor.yml"));

    let prefix: Vec<&str> = cmd.iter().take(8).map(String::as_str).collect();
    assert_eq!(
        prefix,
        vec![
            "ansible-playbook",
            "--diff",
            "-i",
            "testhost,",
            "-c",
            "docker",
            "-e",
            "beamline_acronym=TST",
        ]
    );
}

#[test]
fn flags_toggle_their_arguments() {
    let mut opts = base_options();
    opts.skip_compilation = true;
    opts.verbose = true;
    opts.dry_run = true;
    opts.nsls2network_available = true;
    let cmd = playbook_command(&opts, "ioc", Path::new("c.yml"));

    assert!(cmd.contains(&"install_module_skip_compilation=true".to_string()));
    assert!(cmd.contains(&"-vvv".to_string()));
    assert!(cmd.contains(&"--check".to_string()));
    assert!(cmd.contains(&"deploy_ioc_nsls2network_available=true".to_string()));
    // The playbook path stays last regardless of flags.
    assert_eq!(cmd.last().unwrap(), "scripts/deploy_local_ioc_config.yml");
}

#[test]
fn default_command_omits_optional_flags() {
    let cmd = playbook_command(&base_options(), "ioc", Path::new("c.yml"));
    assert!(!cmd.contains(&"-vvv".to_string()));
    assert!(!cmd.contains(&"--check".to_string()));
    assert!(!cmd.contains(&"install_module_skip_compilation=true".to_string()));
}

#[test]
fn el_gating_reads_the_config_key() {
    let doc: serde_yaml::Value = serde_yaml::from_str(
        "tst-ioc1:\n  environment: {}\ndeploy_ioc_supported_el_versions: [9, 10]\n",
    )
    .unwrap();
    assert_eq!(supported_el_versions(&doc), Some(vec![9, 10]));
}

#[test]
fn configs_without_the_key_support_every_version() {
    let doc: serde_yaml::Value =
        serde_yaml::from_str("tst-ioc1:\n  environment: {}\n").unwrap();
    assert_eq!(supported_el_versions(&doc), None);
}
