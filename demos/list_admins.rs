use ca_admin_rs::{AdminClient, CredentialMaterial, TransportOptions};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ca_url = env::var("CA_ADMIN_URL").unwrap_or_else(|_| "https://ca.example.com".to_string());
    let cert_path = match env::var("CA_ADMIN_CERT_PEM") {
        Ok(value) => value,
        Err(_) => {
            eprintln!("CA_ADMIN_CERT_PEM is not set. Skipping.");
            eprintln!("Example: CA_ADMIN_CERT_PEM=/path/admin-chain.pem");
            return Ok(());
        }
    };
    let key_path = match env::var("CA_ADMIN_KEY_PEM") {
        Ok(value) => value,
        Err(_) => {
            eprintln!("CA_ADMIN_KEY_PEM is not set. Skipping.");
            eprintln!("Example: CA_ADMIN_KEY_PEM=/path/admin-key.pem");
            return Ok(());
        }
    };
    let issuer = env::var("CA_ADMIN_ISSUER").unwrap_or_else(|_| "admin".to_string());

    let mut transport = TransportOptions::new();
    if let Ok(root) = env::var("CA_ROOT_PEM") {
        transport = transport.add_ca_cert_file(root);
    }

    let credentials = CredentialMaterial::from_files(&cert_path, &key_path, &issuer)?;
    let client = AdminClient::builder(&ca_url)?
        .credentials(credentials)
        .transport(transport)
        .retry_on(|status| status == 401)
        .build()?;

    for admin in client.get_admins()? {
        println!("{}\t{}\t{}", admin.id, admin.subject, admin.admin_type);
    }
    for provisioner in client.get_provisioners()? {
        println!("{}\t{}\t{}", provisioner.id, provisioner.name, provisioner.provisioner_type);
    }
    Ok(())
}
