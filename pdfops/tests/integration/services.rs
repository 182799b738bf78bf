//! Integration tests for the file-backed services.

use chrono::Utc;
use pdfops::Config;
use pdfops::services::{ContactForm, Operation, Services};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Services {
    Services::open(&Config::default().with_data_dir(dir.path()))
}

#[test]
fn test_services_survive_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let services = open(&dir);
        services.stats.record_operation(Operation::Split);
        services.stats.record_operation(Operation::ZipDownload);
        services.ratings.submit(5, Some("fast"), Some("/split")).unwrap();
        services
            .contacts
            .submit(ContactForm {
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                email: "grace@example.com".into(),
                subject: "Hello".into(),
                message: "Nice tool".into(),
                ..ContactForm::default()
            })
            .unwrap();
    }

    let services = open(&dir);
    let usage = services.stats.snapshot().unwrap();
    assert_eq!(usage.get("splits"), 1);
    assert_eq!(usage.get("zip_downloads"), 1);
    assert_eq!(usage.get("total_operations"), 2);

    let summary = services.ratings.summary(Utc::now()).unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.recent, 1);

    assert_eq!(services.contacts.unseen_count().unwrap(), 1);
}

#[test]
fn test_concurrent_operation_recording() {
    let dir = TempDir::new().unwrap();
    let services = open(&dir);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..5 {
                    services.stats.record_operation(Operation::Merge);
                }
            });
        }
    });

    assert_eq!(services.stats.get("merges").unwrap(), 20);
}
