use ideaboard::db::Database;
use ideaboard::models::*;
use speculate2::speculate;
use uuid::Uuid;

fn create_test_idea(db: &Database, text: &str) -> Idea {
    db.create_idea(CreateIdeaInput {
        text: text.to_string(),
        description: None,
        author: None,
        priority: None,
    })
    .expect("Failed to create idea")
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "ideas" {
        describe "create_idea" {
            it "creates an idea with required fields" {
                let idea = create_test_idea(&db, "Build a robot");

                assert_eq!(idea.text, "Build a robot");
                assert_eq!(idea.votes, 0);
                assert_eq!(idea.created_at, idea.updated_at);
            }

            it "creates an idea with all fields" {
                let idea = db.create_idea(CreateIdeaInput {
                    text: "Refit the workshop".to_string(),
                    description: Some("New benches".to_string()),
                    author: Some("sam".to_string()),
                    priority: Some(1),
                }).expect("Failed to create idea");

                assert_eq!(idea.description, Some("New benches".to_string()));
                assert_eq!(idea.author, Some("sam".to_string()));
                assert_eq!(idea.priority, Some(1));
            }
        }

        describe "get_idea" {
            it "returns None for non-existent idea" {
                let result = db.get_idea(Uuid::new_v4()).expect("Query failed");
                assert!(result.is_none());
            }

            it "returns the idea with empty notes and attachments" {
                let created = create_test_idea(&db, "Build a robot");

                let found = db.get_idea(created.id).expect("Query failed").expect("Idea missing");
                assert_eq!(found.idea.text, "Build a robot");
                assert!(found.notes.is_empty());
                assert!(found.attachments.is_empty());
            }
        }

        describe "list_ideas" {
            it "returns empty list when no ideas exist" {
                let ideas = db.list_ideas().expect("Query failed");
                assert!(ideas.is_empty());
            }

            it "orders by votes descending then creation time ascending" {
                let low = create_test_idea(&db, "Low");
                let high = create_test_idea(&db, "High");
                let tied = create_test_idea(&db, "Tied");

                db.upvote(high.id).expect("Vote failed");
                db.upvote(high.id).expect("Vote failed");

                let ideas = db.list_ideas().expect("Query failed");
                assert_eq!(ideas.len(), 3);
                assert_eq!(ideas[0].idea.text, "High");
                // Low and Tied both have zero votes; Low was created first
                assert_eq!(ideas[1].idea.text, "Low");
                assert_eq!(ideas[2].idea.text, "Tied");
                assert!(ideas[1].idea.id == low.id && ideas[2].idea.id == tied.id);
            }
        }

        describe "upvote" {
            it "increments votes and refreshes updated_at" {
                let idea = create_test_idea(&db, "Build a robot");

                let updated = db.upvote(idea.id).expect("Vote failed").expect("Idea missing");
                assert_eq!(updated.votes, 1);
                assert!(updated.updated_at > idea.updated_at);
            }

            it "returns None for non-existent idea" {
                let result = db.upvote(Uuid::new_v4()).expect("Vote failed");
                assert!(result.is_none());
            }
        }

        describe "downvote" {
            it "decrements votes" {
                let idea = create_test_idea(&db, "Build a robot");
                db.upvote(idea.id).expect("Vote failed");

                let updated = db.downvote(idea.id).expect("Vote failed").expect("Idea missing");
                assert_eq!(updated.votes, 0);
            }

            it "floors at zero" {
                let idea = create_test_idea(&db, "Build a robot");

                let updated = db.downvote(idea.id).expect("Vote failed").expect("Idea missing");
                assert_eq!(updated.votes, 0);

                let fetched = db.get_idea(idea.id).expect("Query failed").expect("Idea missing");
                assert_eq!(fetched.idea.votes, 0);
            }

            it "leaves updated_at untouched when already at zero" {
                let idea = create_test_idea(&db, "Build a robot");

                let updated = db.downvote(idea.id).expect("Vote failed").expect("Idea missing");
                assert_eq!(updated.votes, 0);
                assert_eq!(updated.updated_at, idea.updated_at);

                let fetched = db.get_idea(idea.id).expect("Query failed").expect("Idea missing");
                assert_eq!(fetched.idea.updated_at, idea.updated_at);
            }
        }
    }

    describe "notes" {
        describe "add_note" {
            it "appends a note and refreshes the idea's updated_at" {
                let idea = create_test_idea(&db, "Build a robot");

                let note = db.add_note(idea.id, CreateNoteInput {
                    content: "Start with the chassis".to_string(),
                }).expect("Insert failed").expect("Idea missing");

                assert_eq!(note.idea_id, idea.id);
                assert_eq!(note.content, "Start with the chassis");

                let fetched = db.get_idea(idea.id).expect("Query failed").expect("Idea missing");
                assert_eq!(fetched.notes.len(), 1);
                assert!(fetched.idea.updated_at > idea.updated_at);
            }

            it "returns None for non-existent idea" {
                let result = db.add_note(Uuid::new_v4(), CreateNoteInput {
                    content: "lost".to_string(),
                }).expect("Insert failed");
                assert!(result.is_none());
            }

            it "keeps notes in insertion order" {
                let idea = create_test_idea(&db, "Build a robot");

                db.add_note(idea.id, CreateNoteInput { content: "first".to_string() })
                    .expect("Insert failed");
                db.add_note(idea.id, CreateNoteInput { content: "second".to_string() })
                    .expect("Insert failed");

                let notes = db.get_notes(idea.id).expect("Query failed");
                assert_eq!(notes.len(), 2);
                assert_eq!(notes[0].content, "first");
                assert_eq!(notes[1].content, "second");
            }
        }
    }

    describe "attachments" {
        describe "add_attachment" {
            it "records metadata against the idea" {
                let idea = create_test_idea(&db, "Build a robot");

                let attachment = db.add_attachment(idea.id, NewAttachment {
                    original_name: "schematic.pdf".to_string(),
                    stored_name: "abc123.pdf".to_string(),
                    mime_type: "application/pdf".to_string(),
                    size: 42,
                }).expect("Insert failed").expect("Idea missing");

                assert_eq!(attachment.original_name, "schematic.pdf");
                assert_eq!(attachment.stored_name, "abc123.pdf");
                assert_eq!(attachment.size, 42);

                let found = db.get_attachment(attachment.id)
                    .expect("Query failed")
                    .expect("Attachment missing");
                assert_eq!(found.idea_id, idea.id);
            }

            it "returns None for non-existent idea" {
                let result = db.add_attachment(Uuid::new_v4(), NewAttachment {
                    original_name: "schematic.pdf".to_string(),
                    stored_name: "abc123.pdf".to_string(),
                    mime_type: "application/pdf".to_string(),
                    size: 42,
                }).expect("Insert failed");
                assert!(result.is_none());
            }
        }

        describe "get_attachment" {
            it "returns None for unknown id" {
                let result = db.get_attachment(Uuid::new_v4()).expect("Query failed");
                assert!(result.is_none());
            }
        }
    }

    describe "stats" {
        it "is all zeroes on an empty board" {
            let stats = db.stats().expect("Query failed");
            assert_eq!(stats.total_ideas, 0);
            assert_eq!(stats.total_votes, 0);
            assert_eq!(stats.this_week, 0);
            assert!(stats.top_idea.is_none());
        }

        it "aggregates counts, vote totals, and the top idea" {
            let first = create_test_idea(&db, "First");
            create_test_idea(&db, "Second");
            db.upvote(first.id).expect("Vote failed");
            db.upvote(first.id).expect("Vote failed");

            let stats = db.stats().expect("Query failed");
            assert_eq!(stats.total_ideas, 2);
            assert_eq!(stats.total_votes, 2);
            assert_eq!(stats.this_week, 2);
            assert_eq!(stats.top_idea.map(|t| t.votes), Some(2));
        }
    }
}
