pub mod random_book;
