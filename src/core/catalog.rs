//! Book catalog
//!
//! A keyed listing store that sits beside the escrow core. Listing and
//! delisting are privileged: they take an [`AdminCap`], which only
//! [`Catalog::new`] can issue. Ratings committed by `rate` reach the catalog as
//! a [`Settlement::Rating`](crate::core::Settlement) and are tallied per listed
//! book.
//!
//! Both maps are `DashMap`s so one catalog can be shared by the sync engine and
//! by every task of the async engine.

use crate::types::{BookId, EscrowError, PartyId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Capability to administer one catalog
///
/// Has no public constructor; the owner is compared by value against the
/// catalog's stored owner on every privileged call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCap {
    owner: PartyId,
}

impl AdminCap {
    pub fn owner(&self) -> &PartyId {
        &self.owner
    }
}

/// A book offered in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookListing {
    pub id: BookId,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RatingTally {
    count: u32,
    total: u64,
}

/// Listings and ratings keyed by book
#[derive(Debug)]
pub struct Catalog {
    owner: PartyId,
    listings: DashMap<BookId, BookListing>,
    ratings: DashMap<BookId, RatingTally>,
}

impl Catalog {
    /// Create an empty catalog and the capability that administers it
    pub fn new(owner: PartyId) -> (Self, AdminCap) {
        let catalog = Catalog {
            owner: owner.clone(),
            listings: DashMap::new(),
            ratings: DashMap::new(),
        };
        (catalog, AdminCap { owner })
    }

    fn ensure_admin(&self, cap: &AdminCap) -> Result<(), EscrowError> {
        if cap.owner != self.owner {
            return Err(EscrowError::NotAdmin {
                holder: cap.owner.clone(),
            });
        }
        Ok(())
    }

    /// Add a book to the catalog
    ///
    /// # Errors
    ///
    /// - `NotAdmin` if `cap` was issued by another catalog
    /// - `BookAlreadyListed` if a listing with this ID exists
    pub fn list_book(&self, cap: &AdminCap, listing: BookListing) -> Result<(), EscrowError> {
        self.ensure_admin(cap)?;
        match self.listings.entry(listing.id.clone()) {
            Entry::Occupied(_) => Err(EscrowError::BookAlreadyListed { book: listing.id }),
            Entry::Vacant(entry) => {
                entry.insert(listing);
                Ok(())
            }
        }
    }

    /// Remove a book and its ratings from the catalog
    pub fn delist_book(&self, cap: &AdminCap, book: &BookId) -> Result<BookListing, EscrowError> {
        self.ensure_admin(cap)?;
        let (_, listing) = self
            .listings
            .remove(book)
            .ok_or_else(|| EscrowError::BookNotListed { book: book.clone() })?;
        self.ratings.remove(book);
        Ok(listing)
    }

    pub fn get(&self, book: &BookId) -> Option<BookListing> {
        self.listings.get(book).map(|entry| entry.value().clone())
    }

    pub fn is_listed(&self, book: &BookId) -> bool {
        self.listings.contains_key(book)
    }

    /// Add a purchase rating to a listed book
    ///
    /// # Errors
    ///
    /// - `InvalidRating` if `rating` is outside 1..=5
    /// - `BookNotListed` if the book is not in the catalog
    pub fn record_rating(&self, book: &BookId, rating: u8) -> Result<(), EscrowError> {
        if !(1..=5).contains(&rating) {
            return Err(EscrowError::InvalidRating { rating });
        }
        if !self.is_listed(book) {
            return Err(EscrowError::BookNotListed { book: book.clone() });
        }

        let mut tally = self.ratings.entry(book.clone()).or_default();
        tally.count = tally.count.saturating_add(1);
        tally.total = tally.total.saturating_add(u64::from(rating));
        Ok(())
    }

    /// Mean rating of a book, `None` until it has been rated
    pub fn average_rating(&self, book: &BookId) -> Option<f64> {
        let tally = *self.ratings.get(book)?;
        if tally.count == 0 {
            return None;
        }
        Some(tally.total as f64 / f64::from(tally.count))
    }
}
